use ultraviolet::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GeometryRef(usize);
impl GeometryRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// An indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.indices.chunks_exact(3).map(|triangle| {
            [
                &self.vertices[triangle[0] as usize],
                &self.vertices[triangle[1] as usize],
                &self.vertices[triangle[2] as usize],
            ]
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Replaces the vertex normals with smooth normals derived from the faces.
    ///
    /// Every face adds its unnormalized normal (`(c - b) x (a - b)`, so larger faces weigh
    /// more) to its three corners. Vertices that are not referenced by any face end up with
    /// a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::zero(); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let position = |i: usize| Vec3::from(self.vertices[i].position);
            let (pa, pb, pc) = (position(a), position(b), position(c));
            let face_normal = (pc - pb).cross(pa - pb);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            let length = normal.mag();
            let normal = if length > 0.0 { normal / length } else { normal };
            vertex.normal = normal.into();
        }
    }
}

/// Geometries can be shared between nodes, so editing one through [`Geometries::get_mut`]
/// changes every node that draws it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometries {
    geometries: Vec<Geometry>,
}

impl Geometries {
    pub fn add(&mut self, geometry: Geometry) -> GeometryRef {
        self.geometries.push(geometry);
        GeometryRef::new(self.geometries.len() - 1)
    }

    pub fn get(&self, id: GeometryRef) -> &Geometry {
        &self.geometries[id.index()]
    }

    pub fn get_mut(&mut self, id: GeometryRef) -> &mut Geometry {
        &mut self.geometries[id.index()]
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}
