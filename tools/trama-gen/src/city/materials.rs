//! City material palette

use std::fmt;

use glam::Vec3;

use crate::color::from_hex;

/// Surface a city part is batched under
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Material {
    Ground,
    Trunk,
    Foliage1,
    Foliage2,
    Foliage3,
    House1,
    House2,
    House3,
    Floor,
    Window,
    Roof,
    Door,
    Grass,
    Post,
    Light1,
    Light2,
    Light3,
    Light4,
    Light5,
}

impl Material {
    pub const ALL: [Material; 19] = [
        Self::Ground,
        Self::Trunk,
        Self::Foliage1,
        Self::Foliage2,
        Self::Foliage3,
        Self::House1,
        Self::House2,
        Self::House3,
        Self::Floor,
        Self::Window,
        Self::Roof,
        Self::Door,
        Self::Grass,
        Self::Post,
        Self::Light1,
        Self::Light2,
        Self::Light3,
        Self::Light4,
        Self::Light5,
    ];

    /// Foliage variant `1..=3` (out-of-range values are clamped)
    pub fn foliage(n: i32) -> Self {
        [Self::Foliage1, Self::Foliage2, Self::Foliage3][n.clamp(1, 3) as usize - 1]
    }

    /// Wall variant `1..=3`
    pub fn house(n: i32) -> Self {
        [Self::House1, Self::House2, Self::House3][n.clamp(1, 3) as usize - 1]
    }

    /// Lamp variant `1..=5`
    pub fn light(n: i32) -> Self {
        [Self::Light1, Self::Light2, Self::Light3, Self::Light4, Self::Light5]
            [n.clamp(1, 5) as usize - 1]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Trunk => "trunk",
            Self::Foliage1 => "foliage1",
            Self::Foliage2 => "foliage2",
            Self::Foliage3 => "foliage3",
            Self::House1 => "house1",
            Self::House2 => "house2",
            Self::House3 => "house3",
            Self::Floor => "floor",
            Self::Window => "window",
            Self::Roof => "roof",
            Self::Door => "door",
            Self::Grass => "grass",
            Self::Post => "post",
            Self::Light1 => "light1",
            Self::Light2 => "light2",
            Self::Light3 => "light3",
            Self::Light4 => "light4",
            Self::Light5 => "light5",
        }
    }

    /// Diffuse colour as `0xrrggbb`
    pub fn base_hex(self) -> u32 {
        match self {
            Self::Ground => 0x887755,
            Self::Trunk => 0x996611,
            Self::Foliage1 => 0x009900,
            Self::Foliage2 => 0x11aa00,
            Self::Foliage3 => 0x008811,
            Self::House1 => 0xffcccc,
            Self::House2 => 0xffccff,
            Self::House3 => 0xccffcc,
            Self::Floor => 0x444444,
            Self::Window => 0x9999ff,
            Self::Roof => 0x993333,
            Self::Door => 0xcccccc,
            Self::Grass => 0x3ff633,
            Self::Post => 0x222222,
            Self::Light1 | Self::Light2 | Self::Light3 | Self::Light4 | Self::Light5 => 0xffffff,
        }
    }

    /// Emissive colour as `0xrrggbb`, if the material glows
    pub fn emissive_hex(self) -> Option<u32> {
        match self {
            Self::Window => Some(0xffffff),
            Self::Light1 => Some(0xffff00),
            Self::Light2 => Some(0xff00ff),
            Self::Light3 => Some(0x77ffff),
            Self::Light4 => Some(0xff5577),
            Self::Light5 => Some(0x7777ff),
            _ => None,
        }
    }

    /// Specular exponent
    pub fn shininess(self) -> f32 {
        match self {
            Self::Window | Self::Post => 64.0,
            Self::Roof | Self::Door => 2.0,
            _ => 30.0,
        }
    }

    pub fn color(self) -> Vec3 {
        from_hex(self.base_hex())
    }

    pub fn emissive(self) -> Option<Vec3> {
        self.emissive_hex().map(from_hex)
    }

    pub fn is_light(self) -> bool {
        matches!(
            self,
            Self::Light1 | Self::Light2 | Self::Light3 | Self::Light4 | Self::Light5
        )
    }

    /// Colour a mesh is painted with: the glow for lamps, the diffuse otherwise
    pub fn display_color(self) -> Vec3 {
        if self.is_light() {
            self.emissive().unwrap_or(Vec3::ONE)
        } else {
            self.color()
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
