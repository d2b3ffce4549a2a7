//! DCM file assembly.
//!
//! A file is built in one pass:
//! `Init -> HeaderWritten -> MaterialsWritten -> PerMeshLoop -> Done`.
//! [`ExportPlan`] gathers targets and materials up front so the header
//! counts are known before anything is written; [`DcmAssembler`] enforces
//! the record order and checks the declared counts on finish.

use super::config::{ExportConfig, ExportScope};
use super::deindex::deindex;
use super::material::write_material;
use super::submesh::{partition, submesh_record};
use super::transform::ObjectTransformer;
use super::vertex::{write_vertices, VERTEX_SIZE};
use crate::error::{DcmError, Result};
use crate::format::{ByteWriter, DataHeader, FileHeader, MeshRecord};
use crate::scene::{Material, MaterialId, MeshData, SceneObject, SceneSource};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Progress of a [`DcmAssembler`] through the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Init,
    HeaderWritten,
    MaterialsWritten,
    PerMeshLoop,
    Done,
}

/// An object with resolved mesh geometry.
#[derive(Debug, Clone)]
pub struct ExportTarget<'s> {
    pub object: &'s SceneObject,
    pub mesh: &'s MeshData,
    /// Per material slot of the object: index into the plan's material list.
    pub material_slots: Vec<Option<usize>>,
}

impl ExportTarget<'_> {
    /// Material id written for submesh `index`. Unassigned slots use 0.
    pub fn material_id(&self, index: usize) -> u8 {
        self.material_slots
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(0) as u8
    }
}

/// Everything collected before the header is written.
#[derive(Debug, Clone, Default)]
pub struct ExportPlan<'s> {
    pub targets: Vec<ExportTarget<'s>>,
    /// Unique materials in first-use order.
    pub materials: Vec<&'s Material>,
    material_ids: Vec<MaterialId>,
    /// Names of objects skipped for lack of mesh geometry.
    pub skipped_targets: Vec<String>,
    /// Material slots that were empty or dangling.
    pub skipped_material_slots: usize,
}

impl<'s> ExportPlan<'s> {
    /// Resolve targets in `scope` and collect their materials, deduplicated by identity.
    pub fn collect<S: SceneSource + ?Sized>(scene: &'s S, scope: ExportScope) -> Self {
        let mut plan = Self::default();

        for object in scene.objects_in_scope(scope) {
            let Some(mesh) = object.resolve_mesh() else {
                tracing::warn!("{}, skipping", DcmError::UnresolvableMesh(object.name.clone()));
                plan.skipped_targets.push(object.name.clone());
                continue;
            };
            if object.mesh.is_none() {
                tracing::debug!("'{}' has no direct mesh, using skinned mesh", object.name);
            }

            let material_slots = object
                .materials
                .iter()
                .map(|slot| plan.resolve_material(scene, &object.name, *slot))
                .collect();

            plan.targets.push(ExportTarget {
                object,
                mesh,
                material_slots,
            });
        }

        plan
    }

    fn resolve_material<S: SceneSource + ?Sized>(
        &mut self,
        scene: &'s S,
        object: &str,
        slot: Option<MaterialId>,
    ) -> Option<usize> {
        let Some(id) = slot else {
            tracing::warn!("'{}' has an empty material slot, skipping", object);
            self.skipped_material_slots += 1;
            return None;
        };
        let Some(material) = scene.material(id) else {
            tracing::warn!(
                "{}, skipping",
                DcmError::MissingMaterial(format!("id {} on '{}'", id.0, object))
            );
            self.skipped_material_slots += 1;
            return None;
        };
        if let Some(index) = self.material_ids.iter().position(|&known| known == id) {
            return Some(index);
        }
        self.material_ids.push(id);
        self.materials.push(material);
        Some(self.materials.len() - 1)
    }

    /// File header for this plan.
    pub fn header(&self) -> Result<FileHeader> {
        let material_count = count_u8("materials", self.materials.len())?;
        let mesh_count = count_u8("meshes", self.targets.len())?;
        Ok(FileHeader::new(material_count, mesh_count))
    }
}

fn count_u8(what: &'static str, count: usize) -> Result<u8> {
    u8::try_from(count).map_err(|_| DcmError::CountOverflow { what, count })
}

/// Sequential writer for one DCM file.
pub struct DcmAssembler<'c> {
    config: &'c ExportConfig,
    writer: ByteWriter,
    state: AssemblerState,
    declared: Option<FileHeader>,
    materials_written: usize,
    meshes_written: usize,
}

impl<'c> DcmAssembler<'c> {
    pub fn new(config: &'c ExportConfig) -> Self {
        Self {
            config,
            writer: ByteWriter::new(),
            state: AssemblerState::Init,
            declared: None,
            materials_written: 0,
            meshes_written: 0,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.writer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    fn require(&self, allowed: &[AssemblerState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(DcmError::InvalidState {
                expected: allowed[0],
                actual: self.state,
            })
        }
    }

    pub fn write_header(&mut self, header: &FileHeader) -> Result<()> {
        self.require(&[AssemblerState::Init])?;
        header.write_to(&mut self.writer);
        self.declared = Some(*header);
        self.state = AssemblerState::HeaderWritten;
        Ok(())
    }

    /// Write the material table. Absent materials are skipped with a warning.
    /// Returns the number of records written.
    pub fn write_materials(&mut self, materials: &[Option<&Material>]) -> Result<usize> {
        self.require(&[AssemblerState::HeaderWritten])?;
        let mut written = 0;
        for material in materials {
            if write_material(&mut self.writer, *material, self.config) {
                written += 1;
            }
        }
        self.materials_written += written;
        self.state = AssemblerState::MaterialsWritten;
        Ok(written)
    }

    /// Write one mesh with its vertices and submeshes.
    /// Returns the number of vertices written.
    pub fn write_mesh(&mut self, local_id: u8, target: &ExportTarget<'_>) -> Result<usize> {
        self.require(&[AssemblerState::MaterialsWritten, AssemblerState::PerMeshLoop])?;
        self.state = AssemblerState::PerMeshLoop;

        let name = target.object.name.as_str();
        let mesh = target.mesh;
        mesh.validate(name)?;

        let transformer = ObjectTransformer::new(&target.object.transform, self.config.conversion);
        let vertices = deindex(mesh, &transformer);
        let ranges = partition(name, mesh, self.config.partitioning)?;
        let submesh_count = count_u8("submeshes", ranges.len())?;
        let submeshes = ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| submesh_record(name, i as u8, target.material_id(i), range))
            .collect::<Result<Vec<_>>>()?;

        let widths = self.config.field_widths;
        let record = MeshRecord {
            header: DataHeader::internal(local_id, name),
            name: name.to_string(),
            submesh_count,
            vertex_count: vertices.len() as u32,
        };

        let reserve = MeshRecord::size(&widths)
            + vertices.len() * VERTEX_SIZE
            + submeshes.iter().map(|s| s.size(&widths)).sum::<usize>();
        let mut chunk = ByteWriter::with_capacity(reserve);
        record.write_to(&mut chunk, &widths);
        write_vertices(&mut chunk, &vertices);
        for submesh in &submeshes {
            submesh.write_to(&mut chunk, &widths);
        }
        self.writer.write_bytes(chunk.as_bytes());

        self.meshes_written += 1;
        Ok(vertices.len())
    }

    /// Close the file and hand back its bytes. The assembler cannot be reused.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        self.require(&[AssemblerState::MaterialsWritten, AssemblerState::PerMeshLoop])?;
        if let Some(header) = self.declared {
            check_count("materials", header.material_count, self.materials_written)?;
            check_count("meshes", header.mesh_count, self.meshes_written)?;
        }
        self.state = AssemblerState::Done;
        Ok(std::mem::take(&mut self.writer).into_bytes())
    }
}

fn check_count(what: &'static str, declared: u8, written: usize) -> Result<()> {
    if declared as usize == written {
        Ok(())
    } else {
        Err(DcmError::CountMismatch {
            what,
            declared: declared as usize,
            written,
        })
    }
}

/// What an export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub mesh_count: usize,
    pub material_count: usize,
    /// Total de-indexed vertices across all meshes.
    pub vertex_count: usize,
    pub skipped_targets: Vec<String>,
    pub skipped_material_slots: usize,
    pub byte_len: usize,
}

/// An encoded DCM file.
#[derive(Debug, Clone)]
pub struct DcmExport {
    pub bytes: Vec<u8>,
    pub summary: ExportSummary,
}

/// Encode the objects of `scene` selected by the config into a DCM file.
pub fn export_dcm<S: SceneSource + ?Sized>(scene: &S, config: &ExportConfig) -> Result<DcmExport> {
    if scene.is_live() {
        return Err(DcmError::Configuration(
            "cannot export while the scene is running".to_string(),
        ));
    }
    config.validate()?;

    let plan = ExportPlan::collect(scene, config.export_scope);
    if plan.targets.is_empty() {
        return Err(DcmError::NoExportTargets);
    }
    let header = plan.header()?;

    tracing::info!(
        "Exporting {} meshes and {} materials",
        plan.targets.len(),
        plan.materials.len()
    );

    let mut assembler = DcmAssembler::new(config);
    assembler.write_header(&header)?;
    let materials: Vec<Option<&Material>> = plan.materials.iter().copied().map(Some).collect();
    assembler.write_materials(&materials)?;

    let mut vertex_count = 0;
    for (i, target) in plan.targets.iter().enumerate() {
        vertex_count += assembler.write_mesh(i as u8, target)?;
    }
    let bytes = assembler.finish()?;

    tracing::info!("Encoded {} vertices into {} bytes", vertex_count, bytes.len());

    let summary = ExportSummary {
        mesh_count: plan.targets.len(),
        material_count: plan.materials.len(),
        vertex_count,
        skipped_targets: plan.skipped_targets,
        skipped_material_slots: plan.skipped_material_slots,
        byte_len: bytes.len(),
    };
    Ok(DcmExport { bytes, summary })
}

/// Encode and write a DCM file to `path`.
///
/// Nothing is created when encoding fails. On a write error the file may be
/// left partially written and should be discarded.
pub fn export_dcm_to_path<S: SceneSource + ?Sized, P: AsRef<Path>>(
    scene: &S,
    config: &ExportConfig,
    path: P,
) -> Result<ExportSummary> {
    let export = export_dcm(scene, config)?;

    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    out.write_all(&export.bytes)?;
    out.flush()?;

    tracing::info!("Wrote {:?}", path.as_ref());
    Ok(export.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{SubmeshPartitioning, TextureExtension};
    use crate::format::{MaterialRecord, SubMeshType};
    use crate::scene::{ColorChannel, Scene, SubmeshRange};
    use crate::types::WorldTransform;

    /// 8 shared corners, 12 triangles.
    fn cube() -> MeshData {
        let positions = vec![
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        let triangles = vec![
            0, 2, 1, 0, 3, 2, // back
            4, 5, 6, 4, 6, 7, // front
            0, 1, 5, 0, 5, 4, // bottom
            3, 7, 6, 3, 6, 2, // top
            0, 4, 7, 0, 7, 3, // left
            1, 2, 6, 1, 6, 5, // right
        ];
        MeshData::new(positions, triangles)
    }

    fn cube_scene() -> Scene {
        let mut scene = Scene::new();
        let material = scene.add_material(Material::new("plain"));
        scene.add_active_object(SceneObject::new("cube").with_mesh(cube()).with_material(Some(material)));
        scene
    }

    fn read_u16(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
    }

    #[test]
    fn test_cube_export() {
        let config = ExportConfig::default();
        let export = export_dcm(&cube_scene(), &config).unwrap();
        let bytes = &export.bytes;
        let widths = config.field_widths;

        let header = FileHeader::from_bytes(bytes).unwrap();
        assert_eq!(header, FileHeader::new(1, 1));

        let mesh_start = FileHeader::SIZE + MaterialRecord::size(&widths);
        let counts = mesh_start + DataHeader::size(&widths) + widths.mesh_name;
        assert_eq!(bytes[counts], 1);
        assert_eq!(read_u32(bytes, counts + 1), 36);

        let submesh_start = mesh_start + MeshRecord::size(&widths) + 36 * VERTEX_SIZE;
        let body = submesh_start + DataHeader::size(&widths);
        assert_eq!(bytes[body], 0);
        assert_eq!(bytes[body + 2], SubMeshType::Indexed.code());
        assert_eq!(read_u16(bytes, body + 3), 36);
        for i in 0..36u32 {
            assert_eq!(read_u32(bytes, body + 5 + 4 * i as usize), i);
        }
        assert_eq!(bytes.len(), body + 5 + 36 * 4);
        assert_eq!(export.summary.vertex_count, 36);
        assert_eq!(export.summary.byte_len, bytes.len());
    }

    #[test]
    fn test_export_is_deterministic() {
        let scene = cube_scene();
        let config = ExportConfig::default();
        let a = export_dcm(&scene, &config).unwrap();
        let b = export_dcm(&scene, &config).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn test_no_targets() {
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("empty"));
        assert!(matches!(
            export_dcm(&scene, &ExportConfig::default()),
            Err(DcmError::NoExportTargets)
        ));
        assert!(matches!(
            export_dcm(&Scene::new(), &ExportConfig::default()),
            Err(DcmError::NoExportTargets)
        ));
    }

    #[test]
    fn test_live_scene_refused() {
        let mut scene = cube_scene();
        scene.live = true;
        assert!(matches!(
            export_dcm(&scene, &ExportConfig::default()),
            Err(DcmError::Configuration(_))
        ));
    }

    #[test]
    fn test_materials_deduplicated_by_identity() {
        let mut scene = Scene::new();
        let a = scene.add_material(Material::new("same"));
        let b = scene.add_material(Material::new("same"));
        scene.add_object(
            SceneObject::new("one")
                .with_mesh(cube())
                .with_material(Some(a))
                .with_material(Some(b)),
        );
        scene.add_object(SceneObject::new("two").with_mesh(cube()).with_material(Some(a)));

        let plan = ExportPlan::collect(&scene, ExportScope::AllObjects);
        assert_eq!(plan.materials.len(), 2);
        assert_eq!(plan.targets[0].material_slots, vec![Some(0), Some(1)]);
        assert_eq!(plan.targets[1].material_slots, vec![Some(0)]);
        assert_eq!(plan.header().unwrap(), FileHeader::new(2, 2));
    }

    #[test]
    fn test_missing_materials_are_skipped() {
        let mut scene = Scene::new();
        scene.add_active_object(
            SceneObject::new("cube")
                .with_mesh(cube())
                .with_material(None)
                .with_material(Some(MaterialId(9))),
        );
        let export = export_dcm(&scene, &ExportConfig::default()).unwrap();
        assert_eq!(export.summary.material_count, 0);
        assert_eq!(export.summary.skipped_material_slots, 2);
        assert_eq!(FileHeader::from_bytes(&export.bytes).unwrap().material_count, 0);
    }

    #[test]
    fn test_meshless_targets_not_counted() {
        let mut scene = Scene::new();
        scene.add_object(SceneObject::new("camera"));
        scene.add_object(SceneObject::new("cube").with_mesh(cube()));
        let config = ExportConfig::default().with_scope(ExportScope::AllObjects);
        let export = export_dcm(&scene, &config).unwrap();
        assert_eq!(export.summary.mesh_count, 1);
        assert_eq!(export.summary.skipped_targets, vec!["camera".to_string()]);
        assert_eq!(FileHeader::from_bytes(&export.bytes).unwrap().mesh_count, 1);
    }

    #[test]
    fn test_skinned_mesh_fallback() {
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("rig").with_skinned_mesh(cube()));
        let export = export_dcm(&scene, &ExportConfig::default()).unwrap();
        assert_eq!(export.summary.vertex_count, 36);
    }

    #[test]
    fn test_repeat_full_stream_per_submesh() {
        let mut mesh = cube();
        mesh.submesh_count = 2;
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("cube").with_mesh(mesh));
        let config = ExportConfig::default();
        let bytes = export_dcm(&scene, &config).unwrap().bytes;

        let widths = config.field_widths;
        let first = FileHeader::SIZE + MeshRecord::size(&widths) + 36 * VERTEX_SIZE;
        let second = first + DataHeader::size(&widths) + 5 + 36 * 4;
        assert_eq!(read_u16(&bytes, first + DataHeader::size(&widths) + 3), 36);
        assert_eq!(read_u16(&bytes, second + DataHeader::size(&widths) + 3), 36);
        assert_eq!(bytes[second + 1], 1);
    }

    #[test]
    fn test_per_submesh_partitioning() {
        let mesh = cube().with_submeshes(vec![SubmeshRange::new(0, 12), SubmeshRange::new(12, 24)]);
        let mut scene = Scene::new();
        let red = scene.add_material(Material::new("red").with_color(ColorChannel::Diffuse, [1.0, 0.0, 0.0, 1.0]));
        let blue = scene.add_material(Material::new("blue").with_texture("water"));
        scene.add_active_object(
            SceneObject::new("cube")
                .with_mesh(mesh)
                .with_material(Some(red))
                .with_material(Some(blue)),
        );
        let config = ExportConfig::default()
            .with_partitioning(SubmeshPartitioning::PerSubmesh)
            .with_texture_extension(TextureExtension::Png);
        let bytes = export_dcm(&scene, &config).unwrap().bytes;

        let widths = config.field_widths;
        let first = FileHeader::SIZE
            + 2 * MaterialRecord::size(&widths)
            + MeshRecord::size(&widths)
            + 36 * VERTEX_SIZE;
        let body = first + DataHeader::size(&widths);
        assert_eq!(bytes[body], 0);
        assert_eq!(read_u16(&bytes, body + 3), 12);

        let second = body + 5 + 12 * 4;
        let body = second + DataHeader::size(&widths);
        assert_eq!(bytes[body], 1);
        assert_eq!(read_u16(&bytes, body + 3), 24);
        assert_eq!(read_u32(&bytes, body + 5), 12);
        assert_eq!(bytes.len(), body + 5 + 24 * 4);
    }

    #[test]
    fn test_material_name_field_follows_data_header() {
        let mut scene = Scene::new();
        let stone = scene.add_material(Material::new("rock").with_texture("stone"));
        scene.add_active_object(SceneObject::new("cube").with_mesh(cube()).with_material(Some(stone)));
        let config = ExportConfig::default();
        let bytes = export_dcm(&scene, &config).unwrap().bytes;

        assert_eq!(&bytes[18..22], b"rock");
        assert_eq!(&bytes[146..156], b"stone.dtex");
        // Ambient white starts right after the 128-byte name field.
        assert_eq!(&bytes[274..278], &1.0f32.to_le_bytes());

        let mesh_start = FileHeader::SIZE + MaterialRecord::size(&config.field_widths);
        assert_eq!(&bytes[mesh_start + 2..mesh_start + 6], b"cube");
    }

    #[test]
    fn test_overflowing_submesh_range_rejected() {
        let mesh = cube().with_submeshes(vec![SubmeshRange::new(u32::MAX, 3)]);
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("cube").with_mesh(mesh));
        let config = ExportConfig::default().with_partitioning(SubmeshPartitioning::PerSubmesh);
        assert!(matches!(export_dcm(&scene, &config), Err(DcmError::InvalidMesh(_))));
    }

    #[test]
    fn test_huge_submesh_count_rejected() {
        let mut mesh = cube();
        mesh.submesh_count = 4_000_000_000;
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("cube").with_mesh(mesh));
        assert!(matches!(
            export_dcm(&scene, &ExportConfig::default()),
            Err(DcmError::CountOverflow { what: "submeshes", count: 4_000_000_000 })
        ));
    }

    #[test]
    fn test_oversized_mesh_rejected() {
        let positions = vec![[0.0; 3]; 3];
        let triangles: Vec<u32> = [0, 1, 2].repeat(21846);
        let mut scene = Scene::new();
        scene.add_active_object(SceneObject::new("huge").with_mesh(MeshData::new(positions, triangles)));
        assert!(matches!(
            export_dcm(&scene, &ExportConfig::default()),
            Err(DcmError::IndexOverflow { count: 65538, .. })
        ));
    }

    #[test]
    fn test_world_transform_applied() {
        let mesh = MeshData::new(vec![[1.0, 0.0, 0.0]; 3], vec![0, 1, 2]);
        let mut scene = Scene::new();
        scene.add_active_object(
            SceneObject::new("tri")
                .with_mesh(mesh)
                .with_transform(WorldTransform::from_translation([2.0, 0.0, 0.0])),
        );
        let config = ExportConfig::default();
        let bytes = export_dcm(&scene, &config).unwrap().bytes;
        let vertex = FileHeader::SIZE + MeshRecord::size(&config.field_widths);
        assert_eq!(&bytes[vertex..vertex + 4], &(-3.0f32).to_le_bytes());
    }

    #[test]
    fn test_assembler_state_order() {
        let config = ExportConfig::default();
        let mut assembler = DcmAssembler::new(&config);
        assert_eq!(assembler.state(), AssemblerState::Init);
        assert!(matches!(
            assembler.write_materials(&[]),
            Err(DcmError::InvalidState { actual: AssemblerState::Init, .. })
        ));

        assembler.write_header(&FileHeader::new(0, 0)).unwrap();
        assert!(assembler.write_header(&FileHeader::new(0, 0)).is_err());
        assert_eq!(assembler.write_materials(&[None]).unwrap(), 0);
        assert_eq!(assembler.state(), AssemblerState::MaterialsWritten);

        let bytes = assembler.finish().unwrap();
        assert_eq!(bytes.len(), FileHeader::SIZE);
        assert_eq!(assembler.state(), AssemblerState::Done);
        assert!(assembler.finish().is_err());
    }

    #[test]
    fn test_assembler_detects_count_mismatch() {
        let config = ExportConfig::default();
        let mut assembler = DcmAssembler::new(&config);
        assembler.write_header(&FileHeader::new(1, 0)).unwrap();
        assembler.write_materials(&[None]).unwrap();
        assert!(matches!(
            assembler.finish(),
            Err(DcmError::CountMismatch { what: "materials", declared: 1, written: 0 })
        ));
    }
}
