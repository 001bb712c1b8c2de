use crate::color::Rgb;

/// Ink color picked by the user: `base` tints the drop, `highlight` is kept
/// for front-ends that draw a rim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkColor {
    pub base: Rgb,
    pub highlight: Rgb,
}

impl InkColor {
    pub const fn solid(color: Rgb) -> Self {
        Self {
            base: color,
            highlight: color,
        }
    }
}

pub const COLOR_POOL: [InkColor; 4] = [
    InkColor {
        base: Rgb::new(0x87, 0xce, 0xeb), // sky
        highlight: Rgb::new(0xff, 0xff, 0xe0),
    },
    InkColor {
        base: Rgb::new(0xff, 0xa5, 0x00), // orange
        highlight: Rgb::new(0xff, 0xd2, 0x7f),
    },
    InkColor {
        base: Rgb::new(0x39, 0xff, 0x14), // neon green
        highlight: Rgb::new(0xdb, 0xff, 0x14),
    },
    InkColor {
        base: Rgb::new(0x00, 0xbf, 0xff), // deep sky
        highlight: Rgb::new(0xe0, 0xff, 0xff),
    },
];

/// Current ink selection: a pool entry unless a custom color overrides it.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    index: usize,
    custom: Option<InkColor>,
}

impl Palette {
    /// Select a pool entry; any integer wraps around the pool, negatives included.
    pub fn set_color_index(&mut self, index: i32) {
        self.index = index.rem_euclid(COLOR_POOL.len() as i32) as usize;
    }

    pub fn set_custom_color(&mut self, color: Option<Rgb>) {
        self.custom = color.map(InkColor::solid);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> InkColor {
        self.custom.unwrap_or(COLOR_POOL[self.index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_wraps_both_ways() {
        let mut p = Palette::default();
        p.set_color_index(5);
        assert_eq!(p.index(), 1);
        p.set_color_index(-1);
        assert_eq!(p.index(), 3);
        assert_eq!(p.current(), COLOR_POOL[3]);
    }

    #[test]
    fn custom_color_overrides_until_cleared() {
        let mut p = Palette::default();
        let pink = Rgb::new(0xff, 0x7f, 0xb0);
        p.set_custom_color(Some(pink));
        assert_eq!(p.current(), InkColor::solid(pink));
        p.set_color_index(2);
        assert_eq!(p.current().base, pink);
        p.set_custom_color(None);
        assert_eq!(p.current(), COLOR_POOL[2]);
    }
}
