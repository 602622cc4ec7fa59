use crate::{asset::Wrapping, color::Color};

/// Parts of the car that a rule singles out.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PartRole {
    /// The logo on the brake discs, it shares the disc material but should be lighter
    BrakeDiscLogo,
    /// Side windows that need to be pulled into the body
    InsetWindow,
}

impl PartRole {
    pub const fn node_name(self) -> &'static str {
        match self {
            PartRole::BrakeDiscLogo => "silver_001_BreakDiscs_0",
            PartRole::InsetWindow => "glass_003",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MaterialRole {
    FrameBlack,
    Chrome,
    BrakeDiscs,
    TiresGum,
    GreyElements,
    /// The body paint
    WhiteCar,
}

impl MaterialRole {
    pub const fn material_name(self) -> &'static str {
        match self {
            MaterialRole::FrameBlack => "FrameBlack",
            MaterialRole::Chrome => "Chrome",
            MaterialRole::BrakeDiscs => "BreakDiscs",
            MaterialRole::TiresGum => "TiresGum",
            MaterialRole::GreyElements => "GreyElements",
            MaterialRole::WhiteCar => "WhiteCar",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeMatcher {
    /// Every renderable node
    AnySurface,
    /// Renderable nodes whose name starts with the prefix
    SurfaceNamePrefix(&'static str),
    /// Exactly one node, it has to exist
    Part(PartRole),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeAction {
    EnableShadows,
    RecomputeNormals,
    /// Gives the node a private copy of `base` and changes only that copy
    ReplaceMaterial {
        base: MaterialRole,
        overrides: MaterialOverrides,
    },
    SetUniformScale(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PatchRule {
    Nodes {
        matcher: NodeMatcher,
        action: NodeAction,
    },
    /// Changes a shared material, every node using it is affected
    Material {
        role: MaterialRole,
        overrides: MaterialOverrides,
    },
}

/// Material properties to overwrite. `None` keeps what the model has.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MaterialOverrides {
    pub color: Option<Color>,
    pub metalness: Option<f32>,
    pub roughness: Option<f32>,
    pub env_map_intensity: Option<f32>,
    pub normal_map: Option<NormalMapOverride>,
    pub normal_scale: Option<[f32; 2]>,
}

impl MaterialOverrides {
    pub const NONE: MaterialOverrides = MaterialOverrides {
        color: None,
        metalness: None,
        roughness: None,
        env_map_intensity: None,
        normal_map: None,
        normal_scale: None,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalMapOverride {
    pub source: NormalMapSource,
    pub wrap: [Wrapping; 2],
    pub repeat: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalMapSource {
    /// See [`crate::flakes`]
    Flakes,
}

/// Corrections for the Lamborghini Urus model, applied top to bottom.
///
/// The order matters: the brake disc logo copies `BreakDiscs` before the disc material
/// itself is darkened, so the logo keeps the original metalness and roughness.
pub static URUS_RULES: &[PatchRule] = &[
    PatchRule::Nodes {
        matcher: NodeMatcher::AnySurface,
        action: NodeAction::EnableShadows,
    },
    // The glass normals are broken in the original model
    PatchRule::Nodes {
        matcher: NodeMatcher::SurfaceNamePrefix("glass"),
        action: NodeAction::RecomputeNormals,
    },
    // Logo is too dark
    PatchRule::Nodes {
        matcher: NodeMatcher::Part(PartRole::BrakeDiscLogo),
        action: NodeAction::ReplaceMaterial {
            base: MaterialRole::BrakeDiscs,
            overrides: MaterialOverrides {
                color: Some(Color::short_hex(0xddd)),
                ..MaterialOverrides::NONE
            },
        },
    },
    PatchRule::Nodes {
        matcher: NodeMatcher::Part(PartRole::InsetWindow),
        action: NodeAction::SetUniformScale(2.7),
    },
    // Inner frame is too light
    PatchRule::Material {
        role: MaterialRole::FrameBlack,
        overrides: MaterialOverrides {
            metalness: Some(0.5),
            roughness: Some(1.0),
            color: Some(Color::BLACK),
            ..MaterialOverrides::NONE
        },
    },
    // Wheels go from chrome to matte black
    PatchRule::Material {
        role: MaterialRole::Chrome,
        overrides: MaterialOverrides {
            metalness: Some(1.0),
            roughness: Some(0.2),
            color: Some(Color::short_hex(0x333)),
            ..MaterialOverrides::NONE
        },
    },
    PatchRule::Material {
        role: MaterialRole::BrakeDiscs,
        overrides: MaterialOverrides {
            metalness: Some(0.2),
            roughness: Some(0.2),
            color: Some(Color::short_hex(0x555)),
            ..MaterialOverrides::NONE
        },
    },
    PatchRule::Material {
        role: MaterialRole::TiresGum,
        overrides: MaterialOverrides {
            metalness: Some(0.0),
            color: Some(Color::short_hex(0x333)),
            ..MaterialOverrides::NONE
        },
    },
    PatchRule::Material {
        role: MaterialRole::GreyElements,
        overrides: MaterialOverrides {
            metalness: Some(0.0),
            color: Some(Color::hex(0x292929)),
            ..MaterialOverrides::NONE
        },
    },
    // Paint goes from yellow to silver with flakes
    PatchRule::Material {
        role: MaterialRole::WhiteCar,
        overrides: MaterialOverrides {
            roughness: Some(0.0),
            metalness: Some(0.15),
            color: Some(Color::short_hex(0x555)),
            env_map_intensity: Some(2.0),
            normal_map: Some(NormalMapOverride {
                source: NormalMapSource::Flakes,
                wrap: [Wrapping::Repeat, Wrapping::Repeat],
                repeat: [40.0, 40.0],
            }),
            normal_scale: Some([0.04, 0.04]),
        },
    },
];
