//! The outbound bug-report payload and its builders.
//!
//! # Design
//! `BugReportRequest` mirrors the server's JSON schema field-for-field. The
//! analysis sections are optional and omitted from the JSON when unset;
//! list fields are always present. Builder methods are pure: they only
//! touch the request value and base64-encode image bytes handed to them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Value of `platform` for reports produced by the converter.
pub const PLATFORM_FBX4VRM: &str = "fbx4vrm";

/// Image format recorded for screenshots.
pub const FORMAT_PNG: &str = "PNG";

/// `yyyy-MM-ddTHH:mm:ssZ`, always UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Random 8-hex-character report id.
pub fn generate_report_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Current UTC time as an ISO-8601 timestamp without fractional seconds.
pub fn current_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Environment & settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub package_version: String,
    /// Version of the host application running the converter.
    pub unity_version: String,
    pub platform: String,
    pub univrm_version: String,
    pub render_pipeline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub vrm_version: u32,
    pub preset_name: String,
    pub output_path: String,
    pub enable_liltoon_conversion: bool,
    pub enable_hdr_clamp: bool,
    pub enable_outline_conversion: bool,
    pub transparent_mode: String,
    pub enable_tpose_normalization: bool,
    pub enable_armature_rotation_bake: bool,
    pub enable_bone_orientation_normalization: bool,
    pub enable_expression_auto_mapping: bool,
    pub expression_naming_convention: String,
    pub enable_springbone_conversion: bool,
    pub enable_collider_conversion: bool,
    pub output_folder: String,
    pub file_name_mode: String,
    pub custom_file_name: String,
}

// ---------------------------------------------------------------------------
// Source model
// ---------------------------------------------------------------------------

/// VRM 0.x metadata embedded in the model file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrmMeta {
    pub title: String,
    pub author: String,
    pub version: String,
    pub contact_information: String,
    /// Reference URL, e.g. the store page.
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceModel {
    pub name: String,
    pub asset_path: String,
    pub source_format: String,
    pub file_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
    pub is_new_avatar: bool,
    /// Version of the avatar package, not of the converter.
    pub package_version: String,
    /// When present the server identifies the avatar from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrm_meta: Option<VrmMeta>,
}

impl Default for SourceModel {
    fn default() -> Self {
        Self {
            name: String::new(),
            asset_path: String::new(),
            source_format: String::new(),
            file_size_bytes: 0,
            avatar_id: None,
            is_new_avatar: true,
            package_version: String::new(),
            vrm_meta: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at_processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub duration_ms: u32,
}

// ---------------------------------------------------------------------------
// Skeleton analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneInfo {
    pub found: u32,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmatureRotation {
    pub euler: Vec<f32>,
    pub requires_normalization: bool,
    pub normalized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneOrientationIssue {
    pub bone: String,
    pub expected_forward: Vec<f32>,
    pub actual_forward: Vec<f32>,
    pub angle_diff_deg: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneOrientations {
    pub issues: Vec<BoneOrientationIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skeleton {
    pub avatar_name: String,
    pub is_humanoid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_bones: Option<BoneInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_bones: Option<BoneInfo>,
    pub bone_hierarchy_valid: bool,
    pub t_pose_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armature_rotation: Option<ArmatureRotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bone_orientations: Option<BoneOrientations>,
    pub total_bones: u32,
}

// ---------------------------------------------------------------------------
// Mesh analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshInfo {
    pub name: String,
    pub vertices: u32,
    pub triangles: u32,
    pub blendshapes: u32,
    pub submeshes: u32,
    pub material_slots: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meshes {
    pub skinned_mesh_count: u32,
    pub mesh_filter_count: u32,
    pub total_vertices: u32,
    pub total_triangles: u32,
    pub blendshape_count: u32,
    pub meshes: Vec<MeshInfo>,
}

// ---------------------------------------------------------------------------
// Material analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderCount {
    pub shader_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialWarning {
    #[serde(rename = "type")]
    pub kind: String,
    pub property: String,
    pub original_value: String,
    pub clamped_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConversionResult {
    pub name: String,
    pub original_shader: String,
    pub target_shader: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub warnings: Vec<MaterialWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsupportedShader {
    pub name: String,
    pub shader: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Materials {
    pub total_count: u32,
    pub original_shaders_list: Vec<ShaderCount>,
    pub conversion_results: Vec<MaterialConversionResult>,
    pub unsupported_shaders: Vec<UnsupportedShader>,
}

// ---------------------------------------------------------------------------
// Expression analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionMapping {
    pub vrm_expression: String,
    pub source: String,
    pub mesh: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConflict {
    pub vrm_expression: String,
    pub candidates: Vec<String>,
    pub selected: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expressions {
    pub total_blendshapes: u32,
    pub mapped_count: u32,
    pub unmapped_count: u32,
    pub mappings: Vec<ExpressionMapping>,
    pub conflicts: Vec<ExpressionConflict>,
    pub missing_recommended: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dynamics analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConversionResult {
    pub name: String,
    pub source_type: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dynamics {
    pub source_type: String,
    pub vrm_springbone_count: u32,
    pub vrchat_physbone_count: u32,
    pub dynamicbone_count: u32,
    pub collider_count: u32,
    pub conversion_results: Vec<DynamicsConversionResult>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSummary {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationItem {
    pub processor_id: String,
    pub message: String,
    pub details: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NotificationSummary>,
    pub errors: Vec<NotificationItem>,
    pub warnings: Vec<NotificationItem>,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A single image (`base64`) or a multi-angle set where `angles[i]` labels
/// `base64_images[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screenshot {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub angles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    pub base64_images: Vec<String>,
}

impl Default for Screenshot {
    fn default() -> Self {
        Self {
            format: FORMAT_PNG.to_string(),
            width: 0,
            height: 0,
            angles: Vec::new(),
            base64: None,
            base64_images: Vec::new(),
        }
    }
}

/// A user-attached image such as a reference picture or an error dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalImage {
    pub filename: String,
    pub format: String,
    pub base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Payload for both the queue and the direct bug-report endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugReportRequest {
    /// Empty until generated by [`ensure_identity`](Self::ensure_identity).
    pub report_id: String,
    pub timestamp: String,
    pub platform: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_settings: Option<ExportSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_model: Option<SourceModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ConversionResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton: Option<Skeleton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meshes: Option<Meshes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Materials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Expressions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<Dynamics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<Notifications>,

    /// Primary screenshot, single image or multi-angle set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<Screenshot>,
    pub additional_screenshots: Vec<Screenshot>,
    pub additional_images: Vec<AdditionalImage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_comment: Option<String>,
}

impl Default for BugReportRequest {
    fn default() -> Self {
        Self {
            report_id: String::new(),
            timestamp: String::new(),
            platform: PLATFORM_FBX4VRM.to_string(),
            environment: None,
            export_settings: None,
            source_model: None,
            result: None,
            skeleton: None,
            meshes: None,
            materials: None,
            expressions: None,
            dynamics: None,
            notifications: None,
            screenshot: None,
            additional_screenshots: Vec::new(),
            additional_images: Vec::new(),
            user_comment: None,
        }
    }
}

impl BugReportRequest {
    /// A report carrying only environment, source model and result.
    ///
    /// `host_version` is the version of the application running the
    /// converter; the host OS is recorded as the environment platform.
    pub fn minimal(
        model_name: &str,
        success: bool,
        package_version: &str,
        host_version: &str,
        error_message: Option<&str>,
        stopped_at_processor: Option<&str>,
    ) -> Self {
        Self {
            report_id: generate_report_id(),
            timestamp: current_timestamp(),
            environment: Some(Environment {
                package_version: package_version.to_string(),
                unity_version: host_version.to_string(),
                platform: std::env::consts::OS.to_string(),
                ..Environment::default()
            }),
            source_model: Some(SourceModel {
                name: model_name.to_string(),
                is_new_avatar: true,
                ..SourceModel::default()
            }),
            result: Some(ConversionResult {
                success,
                error_message: error_message.map(str::to_string),
                stopped_at_processor: stopped_at_processor.map(str::to_string),
                ..ConversionResult::default()
            }),
            ..Self::default()
        }
    }

    /// Like [`minimal`](Self::minimal), attributed to an avatar the server
    /// already knows.
    pub fn for_existing_avatar(
        avatar_id: &str,
        model_name: &str,
        success: bool,
        package_version: &str,
        host_version: &str,
        error_message: Option<&str>,
        stopped_at_processor: Option<&str>,
    ) -> Self {
        let mut request = Self::minimal(
            model_name,
            success,
            package_version,
            host_version,
            error_message,
            stopped_at_processor,
        );
        if let Some(source) = request.source_model.as_mut() {
            source.avatar_id = Some(avatar_id.to_string());
            source.is_new_avatar = false;
        }
        request
    }

    /// Fill in `report_id` and `timestamp` if either is empty. Returns
    /// whether anything changed.
    pub fn ensure_identity(&mut self) -> bool {
        let mut changed = false;
        if self.report_id.is_empty() {
            self.report_id = generate_report_id();
            changed = true;
        }
        if self.timestamp.is_empty() {
            self.timestamp = current_timestamp();
            changed = true;
        }
        changed
    }

    /// Replace the primary screenshot with a single PNG image. Empty input
    /// leaves the request untouched.
    pub fn add_screenshot(&mut self, png: &[u8], width: u32, height: u32) {
        if png.is_empty() {
            return;
        }
        self.screenshot = Some(Screenshot {
            format: FORMAT_PNG.to_string(),
            width,
            height,
            base64: Some(STANDARD.encode(png)),
            ..Screenshot::default()
        });
    }

    /// Append labeled PNG images to the primary screenshot, keeping the
    /// iteration order. Empty images are skipped.
    pub fn add_multi_angle_screenshots<'a, I, S>(&mut self, screenshots: I, width: u32, height: u32)
    where
        I: IntoIterator<Item = (S, &'a [u8])>,
        S: Into<String>,
    {
        for (angle, png) in screenshots {
            if png.is_empty() {
                continue;
            }
            // The primary screenshot exists only once there is an image to attach.
            let screenshot = self.screenshot.get_or_insert_with(|| Screenshot {
                width,
                height,
                ..Screenshot::default()
            });
            if screenshot.width == 0 {
                screenshot.width = width;
                screenshot.height = height;
            }
            screenshot.angles.push(angle.into());
            screenshot.base64_images.push(STANDARD.encode(png));
        }
    }

    /// Attach a freeform image. Empty input leaves the request untouched.
    pub fn add_additional_image(
        &mut self,
        bytes: &[u8],
        filename: &str,
        format: &str,
        description: Option<&str>,
    ) {
        if bytes.is_empty() {
            return;
        }
        self.additional_images.push(AdditionalImage {
            filename: filename.to_string(),
            format: format.to_string(),
            base64: STANDARD.encode(bytes),
            description: description.map(str::to_string),
        });
    }
}
