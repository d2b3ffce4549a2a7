//! DCM export pipeline.
//!
//! Objects are transformed and de-indexed, materials encoded, and the whole
//! file assembled in a single pass.

pub mod assembler;
pub mod config;
pub mod deindex;
pub mod material;
pub mod submesh;
pub mod transform;
pub mod vertex;

pub use assembler::{
    export_dcm, export_dcm_to_path, AssemblerState, DcmAssembler, DcmExport, ExportPlan,
    ExportSummary, ExportTarget,
};
pub use config::{ExportConfig, ExportScope, SubmeshPartitioning, TextureExtension};
pub use deindex::{deindex, ExpandedVertex};
pub use transform::{transform_point, transform_vector, ObjectTransformer};
