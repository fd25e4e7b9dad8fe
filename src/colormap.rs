//! Named colormaps for colouring words.
//!
//! Names follow matplotlib. Continuous maps are stored as evenly spaced
//! sRGB stops and interpolated linearly; qualitative maps pick the nearest
//! entry. Appending `_r` to any name reverses it.

use image::Rgba;
use palette::{Hsl, IntoColor, Pixel, Srgb};

use crate::WordCloudError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Continuous,
    Qualitative,
    Hue,
}

#[derive(Clone, Debug)]
pub struct Colormap {
    name: String,
    kind: Kind,
    stops: Vec<[u8; 3]>,
    reversed: bool,
}

const fn hex(value: u32) -> [u8; 3] {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

fn stops_for(name: &str) -> Option<(Kind, Vec<[u8; 3]>)> {
    use Kind::*;

    let (kind, values): (Kind, &[u32]) = match name {
        "viridis" => (
            Continuous,
            &[
                0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30,
                0xfde725,
            ],
        ),
        "plasma" => (
            Continuous,
            &[
                0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a,
                0xfdca26, 0xf0f921,
            ],
        ),
        "inferno" => (
            Continuous,
            &[
                0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06,
                0xf7d13d, 0xfcffa4,
            ],
        ),
        "magma" => (
            Continuous,
            &[
                0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668,
                0xfeca8d, 0xfcfdbf,
            ],
        ),
        "cividis" => (
            Continuous,
            &[
                0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8779, 0xa69d75, 0xc4b56c,
                0xe4cf5b, 0xfee838,
            ],
        ),
        "Greys" => (Continuous, &[0xffffff, 0x000000]),
        "gray" | "grey" => (Continuous, &[0x000000, 0xffffff]),
        "Blues" => (
            Continuous,
            &[
                0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c,
                0x08306b,
            ],
        ),
        "Greens" => (
            Continuous,
            &[
                0xf7fcf5, 0xe5f5e0, 0xc7e9c0, 0xa1d99b, 0x74c476, 0x41ab5d, 0x238b45, 0x006d2c,
                0x00441b,
            ],
        ),
        "Reds" => (
            Continuous,
            &[
                0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a, 0xef3b2c, 0xcb181d, 0xa50f15,
                0x67000d,
            ],
        ),
        "Oranges" => (
            Continuous,
            &[
                0xfff5eb, 0xfee6ce, 0xfdd0a2, 0xfdae6b, 0xfd8d3c, 0xf16913, 0xd94801, 0xa63603,
                0x7f2704,
            ],
        ),
        "Purples" => (
            Continuous,
            &[
                0xfcfbfd, 0xefedf5, 0xdadaeb, 0xbcbddc, 0x9e9ac8, 0x807dba, 0x6a51a3, 0x54278f,
                0x3f007d,
            ],
        ),
        "hot" => (Continuous, &[0x0a0000, 0xff0000, 0xffff00, 0xffffff]),
        "cool" => (Continuous, &[0x00ffff, 0xff00ff]),
        "spring" => (Continuous, &[0xff00ff, 0xffff00]),
        "summer" => (Continuous, &[0x008066, 0xffff66]),
        "autumn" => (Continuous, &[0xff0000, 0xffff00]),
        "winter" => (Continuous, &[0x0000ff, 0x00ff80]),
        "copper" => (Continuous, &[0x000000, 0xffc77f]),
        "jet" => (
            Continuous,
            &[
                0x00007f, 0x0000ff, 0x007fff, 0x00ffff, 0x7fff7f, 0xffff00, 0xff7f00, 0xff0000,
                0x7f0000,
            ],
        ),
        "hsv" => (Hue, &[]),
        "tab10" => (
            Qualitative,
            &[
                0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f,
                0xbcbd22, 0x17becf,
            ],
        ),
        "Dark2" => (
            Qualitative,
            &[
                0x1b9e77, 0xd95f02, 0x7570b3, 0xe7298a, 0x66a61e, 0xe6ab02, 0xa6761d, 0x666666,
            ],
        ),
        "Set1" => (
            Qualitative,
            &[
                0xe41a1c, 0x377eb8, 0x4daf4a, 0x984ea3, 0xff7f00, 0xffff33, 0xa65628, 0xf781bf,
                0x999999,
            ],
        ),
        _ => return None,
    };

    Some((kind, values.iter().copied().map(hex).collect()))
}

fn to_float([red, green, blue]: [u8; 3]) -> Srgb {
    Srgb::new(red, green, blue).into_format()
}

impl Colormap {
    pub fn from_name(name: &str) -> Result<Self, WordCloudError> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };

        let (kind, stops) =
            stops_for(base).ok_or_else(|| WordCloudError::UnknownColormap(name.to_owned()))?;

        Ok(Colormap {
            name: name.to_owned(),
            kind,
            stops,
            reversed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colour at position `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, t: f32) -> Rgba<u8> {
        let t = t.clamp(0.0, 1.0);
        let t = if self.reversed { 1.0 - t } else { t };

        let raw: [u8; 3] = match self.kind {
            Kind::Hue => {
                let col = Hsl::new(t * 360.0, 1.0, 0.5);
                let rgb: Srgb = col.into_color();
                rgb.into_format().into_raw()
            }
            Kind::Qualitative => {
                let last = self.stops.len() - 1;
                let index = ((t * self.stops.len() as f32) as usize).min(last);
                self.stops[index]
            }
            Kind::Continuous => {
                let last = self.stops.len() - 1;
                let position = t * last as f32;
                let index = (position.floor() as usize).min(last);
                let next = (index + 1).min(last);
                let fraction = position - index as f32;
                if fraction <= 0.0 {
                    return to_rgba(self.stops[index]);
                }

                let from = to_float(self.stops[index]);
                let to = to_float(self.stops[next]);
                let mixed = Srgb::new(
                    from.red + (to.red - from.red) * fraction,
                    from.green + (to.green - from.green) * fraction,
                    from.blue + (to.blue - from.blue) * fraction,
                );
                mixed.into_format().into_raw()
            }
        };

        to_rgba(raw)
    }
}

fn to_rgba([red, green, blue]: [u8; 3]) -> Rgba<u8> {
    Rgba([red, green, blue, 255])
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use rstest::rstest;

    use super::Colormap;
    use crate::WordCloudError;

    #[rstest]
    #[case("viridis", 0.0, Rgba([0x44, 0x01, 0x54, 255]))]
    #[case("viridis", 1.0, Rgba([0xfd, 0xe7, 0x25, 255]))]
    #[case("viridis_r", 0.0, Rgba([0xfd, 0xe7, 0x25, 255]))]
    #[case("tab10", 0.05, Rgba([0x1f, 0x77, 0xb4, 255]))]
    #[case("tab10", 1.0, Rgba([0x17, 0xbe, 0xcf, 255]))]
    #[case("hsv", 0.0, Rgba([255, 0, 0, 255]))]
    fn samples_known_points(#[case] name: &str, #[case] t: f32, #[case] expected: Rgba<u8>) {
        let colormap = Colormap::from_name(name).unwrap();

        assert_eq!(colormap.sample(t), expected);
    }

    #[test]
    fn continuous_maps_interpolate_between_stops() {
        let Rgba([red, green, blue, alpha]) = Colormap::from_name("gray").unwrap().sample(0.5);

        assert!((127..=128).contains(&red));
        assert_eq!((red, alpha), (green, 255));
        assert_eq!(green, blue);
    }

    #[test]
    fn out_of_range_positions_are_clamped() {
        let colormap = Colormap::from_name("Blues").unwrap();
        assert_eq!(colormap.name(), "Blues");

        assert_eq!(colormap.sample(-3.0), colormap.sample(0.0));
        assert_eq!(colormap.sample(7.5), colormap.sample(1.0));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Colormap::from_name("not-a-colormap").unwrap_err();

        assert!(matches!(err, WordCloudError::UnknownColormap(name) if name == "not-a-colormap"));
    }
}
