//! Soft shadows on the floor under the car, rendered from below with an orthographic
//! camera and blurred. Faraway geometry gets lighter, geometry touching the floor is
//! darkest.

use ultraviolet::{Vec2, Vec3};

use crate::asset::Asset;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactShadowSettings {
    /// Texels along each edge of the shadow map
    pub resolution: u32,
    /// How many frames the shadow is rendered before it freezes
    pub frames: u32,
    /// Height of the floor plane
    pub position_y: f32,
    /// Edge length of the square the shadow covers
    pub scale: f32,
    pub blur: f32,
    pub opacity: f32,
    /// Geometry this far above the floor no longer casts a shadow
    pub far: f32,
}

impl Default for ContactShadowSettings {
    fn default() -> Self {
        Self {
            resolution: 2048,
            frames: 1,
            position_y: -1.16,
            scale: 10.0,
            blur: 0.75,
            opacity: 1.0,
            far: 10.0,
        }
    }
}

impl ContactShadowSettings {
    /// Blur radius in texels
    pub fn blur_radius(&self) -> usize {
        (self.blur / 256.0 * self.resolution as f32).round() as usize
    }
}

/// Shadow opacity per texel, row by row along +z, each row along +x.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactShadowMap {
    pub resolution: u32,
    pub scale: f32,
    pub position_y: f32,
    pub opacity: Vec<f32>,
}

impl ContactShadowMap {
    pub fn texel(&self, x: u32, z: u32) -> f32 {
        self.opacity[(z * self.resolution + x) as usize]
    }

    /// Shadow opacity at a point on the floor, zero outside the covered square.
    pub fn opacity_at(&self, x: f32, z: f32) -> f32 {
        let to_texel = |coordinate: f32| {
            let texel = ((coordinate / self.scale + 0.5) * self.resolution as f32).floor();
            (texel >= 0.0 && texel < self.resolution as f32).then_some(texel as u32)
        };
        match (to_texel(x), to_texel(z)) {
            (Some(x), Some(z)) => self.texel(x, z),
            _ => 0.0,
        }
    }

    pub fn max_opacity(&self) -> f32 {
        self.opacity.iter().copied().fold(0.0, f32::max)
    }
}

pub struct ContactShadows {
    pub settings: ContactShadowSettings,
    frames_baked: u32,
    map: Option<ContactShadowMap>,
}

impl ContactShadows {
    pub fn new(settings: ContactShadowSettings) -> Self {
        Self {
            settings,
            frames_baked: 0,
            map: None,
        }
    }

    /// Renders the shadow for this frame unless it is already frozen.
    pub fn update(&mut self, asset: &Asset) -> &ContactShadowMap {
        if self.map.is_none() || self.frames_baked < self.settings.frames {
            self.frames_baked += 1;
            log::info!(
                "Baking contact shadows, frame {} of {}",
                self.frames_baked,
                self.settings.frames
            );
            self.map.insert(bake(&self.settings, asset))
        } else {
            log::trace!("Contact shadows are frozen");
            self.map.get_or_insert_with(|| bake(&self.settings, asset))
        }
    }

    pub fn map(&self) -> Option<&ContactShadowMap> {
        self.map.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.frames_baked >= self.settings.frames
    }
}

pub fn bake(settings: &ContactShadowSettings, asset: &Asset) -> ContactShadowMap {
    let resolution = settings.resolution.max(1) as usize;
    let mut darkness = vec![0.0f32; resolution * resolution];

    let mut triangle_count = 0;
    for (transform, _node, surface) in asset.world_surfaces() {
        let geometry = asset.geometries.get(surface.geometry);
        for triangle in geometry.triangles() {
            let corners =
                triangle.map(|vertex| transform.transform_point(Vec3::from(vertex.position)));
            rasterize(settings, &corners, &mut darkness);
            triangle_count += 1;
        }
    }
    log::debug!("Contact shadows rasterized {} triangles", triangle_count);

    let radius = settings.blur_radius();
    let blurred = box_blur(&darkness, resolution, radius);
    ContactShadowMap {
        resolution: resolution as u32,
        scale: settings.scale,
        position_y: settings.position_y,
        opacity: blurred
            .into_iter()
            .map(|value| (value * settings.opacity).clamp(0.0, 1.0))
            .collect(),
    }
}

fn rasterize(settings: &ContactShadowSettings, corners: &[Vec3; 3], darkness: &mut [f32]) {
    let heights = corners.map(|corner| corner.y - settings.position_y);
    if heights.iter().all(|height| *height < 0.0) || heights.iter().all(|h| *h > settings.far) {
        return;
    }

    let resolution = settings.resolution.max(1) as usize;
    // Floor coordinates in texel units
    let points = corners.map(|corner| {
        Vec2::new(
            (corner.x / settings.scale + 0.5) * resolution as f32,
            (corner.z / settings.scale + 0.5) * resolution as f32,
        )
    });

    let area = edge(points[0], points[1], points[2]);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min = points[0].min_by_component(points[1]).min_by_component(points[2]);
    let max = points[0].max_by_component(points[1]).max_by_component(points[2]);
    let clamp_texel = |value: f32| value.clamp(0.0, resolution as f32) as usize;
    let (x_start, x_end) = (clamp_texel(min.x.floor()), clamp_texel(max.x.ceil()));
    let (z_start, z_end) = (clamp_texel(min.y.floor()), clamp_texel(max.y.ceil()));

    for z in z_start..z_end {
        for x in x_start..x_end {
            let center = Vec2::new(x as f32 + 0.5, z as f32 + 0.5);
            let weights = [
                edge(points[1], points[2], center) / area,
                edge(points[2], points[0], center) / area,
                edge(points[0], points[1], center) / area,
            ];
            if weights.iter().any(|weight| *weight < 0.0) {
                continue;
            }
            let height: f32 = weights.iter().zip(heights).map(|(w, h)| w * h).sum();
            if !(0.0..=settings.far).contains(&height) {
                continue;
            }
            let texel = &mut darkness[z * resolution + x];
            *texel = texel.max(1.0 - height / settings.far);
        }
    }
}

/// Twice the signed area of the triangle `a b c`
fn edge(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Horizontal pass, then vertical pass. Texels outside the map count as unshadowed.
fn box_blur(values: &[f32], resolution: usize, radius: usize) -> Vec<f32> {
    if radius == 0 {
        return values.to_vec();
    }

    let mut horizontal = vec![0.0; values.len()];
    for row in 0..resolution {
        let line = &values[row * resolution..(row + 1) * resolution];
        let output = &mut horizontal[row * resolution..(row + 1) * resolution];
        blur_line(resolution, radius, |i| line[i], |i, value| output[i] = value);
    }

    let mut vertical = vec![0.0; values.len()];
    for column in 0..resolution {
        blur_line(
            resolution,
            radius,
            |i| horizontal[i * resolution + column],
            |i, value| vertical[i * resolution + column] = value,
        );
    }
    vertical
}

fn blur_line(
    length: usize,
    radius: usize,
    get: impl Fn(usize) -> f32,
    mut set: impl FnMut(usize, f32),
) {
    let window = (2 * radius + 1) as f32;
    for i in 0..length {
        let start = i.saturating_sub(radius);
        let end = (i + radius + 1).min(length);
        let sum: f32 = (start..end).map(&get).sum();
        set(i, sum / window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        asset::{shapes, Material, Node},
        transform::Transform,
    };

    /// A flat square hovering `height` above the floor, facing down
    fn hovering_square(height: f32, size: f32) -> Asset {
        let mut asset = Asset::new();
        let geometry = asset.geometries.add(shapes::plane());
        let material = asset.materials.add(Material::new("Paint"));
        let mut node = Node::surface("square", geometry, material);
        node.transform = Transform::from_position(Vec3::new(0.0, -1.16 + height, 0.0))
            .with_rotation_x(std::f32::consts::FRAC_PI_2)
            .with_uniform_scale(size);
        asset.add_node(node, None);
        asset
    }

    fn small_settings() -> ContactShadowSettings {
        ContactShadowSettings {
            resolution: 64,
            blur: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn default_blur_radius() {
        assert_eq!(ContactShadowSettings::default().blur_radius(), 6);
    }

    #[test]
    fn geometry_close_to_the_floor_is_darker() {
        let settings = small_settings();
        let low = bake(&settings, &hovering_square(1.0, 2.0));
        let high = bake(&settings, &hovering_square(5.0, 2.0));

        assert!((low.opacity_at(0.0, 0.0) - 0.9).abs() < 1e-4);
        assert!((high.opacity_at(0.0, 0.0) - 0.5).abs() < 1e-4);
        assert_eq!(low.opacity_at(3.0, 3.0), 0.0);
        assert_eq!(low.opacity_at(20.0, 0.0), 0.0);
    }

    #[test]
    fn geometry_out_of_range_casts_nothing() {
        let settings = small_settings();
        assert_eq!(bake(&settings, &hovering_square(-0.5, 2.0)).max_opacity(), 0.0);
        assert_eq!(bake(&settings, &hovering_square(11.0, 2.0)).max_opacity(), 0.0);
    }

    #[test]
    fn blur_softens_the_edges() {
        let square = hovering_square(0.01, 2.0);
        let sharp = bake(&small_settings(), &square);
        let soft = bake(
            &ContactShadowSettings {
                blur: 16.0,
                ..small_settings()
            },
            &square,
        );
        let inside_edge = 0.9;
        assert!((sharp.opacity_at(inside_edge, 0.0) - 0.999).abs() < 1e-4);
        assert!(soft.opacity_at(inside_edge, 0.0) < 0.9);
        assert!(soft.opacity_at(1.1, 0.0) > 0.0);
        assert_eq!(sharp.opacity_at(1.1, 0.0), 0.0);
    }

    #[test]
    fn opacity_scales_the_result() {
        let settings = ContactShadowSettings {
            opacity: 0.5,
            ..small_settings()
        };
        let map = bake(&settings, &hovering_square(0.01, 2.0));
        assert!((map.max_opacity() - 0.4995).abs() < 1e-4);
    }

    #[test]
    fn single_frame_shadows_freeze() {
        let mut shadows = ContactShadows::new(small_settings());
        assert!(!shadows.is_frozen());
        let first = shadows.update(&hovering_square(1.0, 2.0)).clone();
        assert!(shadows.is_frozen());

        // Moving the geometry afterwards no longer changes the shadow
        let second = shadows.update(&hovering_square(5.0, 2.0)).clone();
        assert_eq!(first, second);
    }
}
