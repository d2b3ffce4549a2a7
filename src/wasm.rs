//! WASM bindings for dcm-export.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.

use crate::{export_dcm, ExportConfig, ExportScope, Scene, SubmeshPartitioning, TextureExtension};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

/// Export configuration options.
#[wasm_bindgen]
#[derive(Default)]
pub struct DcmOptions {
    png_textures: bool,
    all_objects: bool,
    partition_submeshes: bool,
}

#[wasm_bindgen]
impl DcmOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DcmOptions {
        DcmOptions::default()
    }

    #[wasm_bindgen(setter)]
    pub fn set_png_textures(&mut self, value: bool) {
        self.png_textures = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_all_objects(&mut self, value: bool) {
        self.all_objects = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_partition_submeshes(&mut self, value: bool) {
        self.partition_submeshes = value;
    }
}

impl DcmOptions {
    fn to_config(&self) -> ExportConfig {
        let mut config = ExportConfig::default();
        if self.png_textures {
            config.texture_extension = TextureExtension::Png;
        }
        if self.all_objects {
            config.export_scope = ExportScope::AllObjects;
        }
        if self.partition_submeshes {
            config.partitioning = SubmeshPartitioning::PerSubmesh;
        }
        config
    }
}

/// Result of an export.
#[wasm_bindgen]
pub struct DcmResult {
    bytes: Vec<u8>,
    mesh_count: usize,
    material_count: usize,
    vertex_count: usize,
}

#[wasm_bindgen]
impl DcmResult {
    /// The DCM file bytes.
    #[wasm_bindgen(getter)]
    pub fn dcm_data(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mesh_count(&self) -> usize {
        self.mesh_count
    }

    #[wasm_bindgen(getter)]
    pub fn material_count(&self) -> usize {
        self.material_count
    }

    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// Export a JSON scene description to DCM.
#[wasm_bindgen]
pub fn export_scene_json(scene_json: &str, options: Option<DcmOptions>) -> Result<DcmResult, JsError> {
    let scene = Scene::from_json_str(scene_json).map_err(|e| JsError::new(&e.to_string()))?;
    let config = options.unwrap_or_default().to_config();
    let export = export_dcm(&scene, &config).map_err(|e| JsError::new(&e.to_string()))?;

    Ok(DcmResult {
        mesh_count: export.summary.mesh_count,
        material_count: export.summary.material_count,
        vertex_count: export.summary.vertex_count,
        bytes: export.bytes,
    })
}

/// Export with a full JSON configuration document.
#[wasm_bindgen]
pub fn export_scene_json_with_config(scene_json: &str, config_json: &str) -> Result<Vec<u8>, JsError> {
    let scene = Scene::from_json_str(scene_json).map_err(|e| JsError::new(&e.to_string()))?;
    let config = ExportConfig::from_json_str(config_json).map_err(|e| JsError::new(&e.to_string()))?;
    let export = export_dcm(&scene, &config).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(export.bytes)
}
