use image::RgbaImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bitmap;
use crate::style::AiStyle;
use crate::util::time;

pub type ProjectId = Uuid;

/// A persisted unit of work: a sketch, its generated counterpart and the
/// settings that produced it.
///
/// Bitmaps are kept encoded (PNG) and decoded on access. Every mutator bumps
/// `updated_at`, and loading never yields an `updated_at` before `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredProject")]
pub struct Project {
    id: ProjectId,
    name: String,
    created_at: f64,
    updated_at: f64,
    #[serde(default, with = "blob")]
    canvas_data: Option<Vec<u8>>,
    #[serde(default, with = "blob")]
    generated_image_data: Option<Vec<u8>>,
    #[serde(default, with = "blob")]
    drawing_data: Option<Vec<u8>>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    ai_style: AiStyle,
    #[serde(default)]
    is_favorite: bool,
}

/// On-disk shape of a project, before its timestamps are checked
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProject {
    id: ProjectId,
    name: String,
    created_at: f64,
    updated_at: f64,
    #[serde(default, with = "blob")]
    canvas_data: Option<Vec<u8>>,
    #[serde(default, with = "blob")]
    generated_image_data: Option<Vec<u8>>,
    #[serde(default, with = "blob")]
    drawing_data: Option<Vec<u8>>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    ai_style: AiStyle,
    #[serde(default)]
    is_favorite: bool,
}

impl From<StoredProject> for Project {
    fn from(stored: StoredProject) -> Self {
        if stored.updated_at < stored.created_at {
            log::warn!("Project {} was updated before it was created, clamping", stored.id);
        }
        Self {
            id: stored.id,
            name: stored.name,
            created_at: stored.created_at,
            updated_at: stored.updated_at.max(stored.created_at),
            canvas_data: stored.canvas_data,
            generated_image_data: stored.generated_image_data,
            drawing_data: stored.drawing_data,
            prompt: stored.prompt,
            ai_style: stored.ai_style,
            is_favorite: stored.is_favorite,
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        let now = time::current_time_secs();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            canvas_data: None,
            generated_image_data: None,
            drawing_data: None,
            prompt: None,
            ai_style: AiStyle::default(),
            is_favorite: false,
        }
    }

    /// Copy of `source` under a fresh identity and fresh timestamps.
    ///
    /// Content (bitmaps, strokes, prompt, style) is carried over; the
    /// favorite flag is not.
    pub fn duplicate_of(source: &Project, name: impl Into<String>) -> Self {
        let mut copy = Self::new(name);
        copy.canvas_data = source.canvas_data.clone();
        copy.generated_image_data = source.generated_image_data.clone();
        copy.drawing_data = source.drawing_data.clone();
        copy.prompt = source.prompt.clone();
        copy.ai_style = source.ai_style;
        copy
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    pub fn updated_at(&self) -> f64 {
        self.updated_at
    }

    pub fn canvas_data(&self) -> Option<&[u8]> {
        self.canvas_data.as_deref()
    }

    pub fn generated_image_data(&self) -> Option<&[u8]> {
        self.generated_image_data.as_deref()
    }

    pub fn drawing_data(&self) -> Option<&[u8]> {
        self.drawing_data.as_deref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn ai_style(&self) -> AiStyle {
        self.ai_style
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// A project nobody has drawn in or generated for yet
    pub fn is_new(&self) -> bool {
        self.canvas_data.is_none() && self.generated_image_data.is_none()
    }

    pub fn canvas_image(&self) -> Option<RgbaImage> {
        decode_blob(self.id, "canvas", self.canvas_data.as_deref())
    }

    pub fn generated_image(&self) -> Option<RgbaImage> {
        decode_blob(self.id, "generated", self.generated_image_data.as_deref())
    }

    pub fn set_canvas_image(&mut self, image: &RgbaImage) {
        if let Some(bytes) = encode_blob(self.id, "canvas", image) {
            self.canvas_data = Some(bytes);
            self.touch();
        }
    }

    pub fn set_generated_image(&mut self, image: &RgbaImage) {
        if let Some(bytes) = encode_blob(self.id, "generated", image) {
            self.generated_image_data = Some(bytes);
            self.touch();
        }
    }

    pub fn set_drawing_data(&mut self, data: Option<Vec<u8>>) {
        self.drawing_data = data;
        self.touch();
    }

    pub fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
        self.touch();
    }

    pub fn set_style(&mut self, style: AiStyle) {
        self.ai_style = style;
        self.touch();
    }

    /// Overwrite the name. Callers reject empty names before getting here.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
        self.touch();
    }

    /// Bump `updated_at`, never letting it fall behind `created_at`
    /// (the wall clock may step backwards).
    fn touch(&mut self) {
        self.updated_at = time::current_time_secs().max(self.created_at);
    }
}

fn encode_blob(id: ProjectId, what: &str, image: &RgbaImage) -> Option<Vec<u8>> {
    match bitmap::encode_png(image) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::error!("Failed to encode {} image for project {}: {}", what, id, err);
            None
        }
    }
}

fn decode_blob(id: ProjectId, what: &str, bytes: Option<&[u8]>) -> Option<RgbaImage> {
    let bytes = bytes?;
    match bitmap::decode(bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            log::warn!("Failed to decode {} image for project {}: {}", what, id, err);
            None
        }
    }
}

/// Optional byte blobs as base64 strings inside JSON
mod blob {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|text| STANDARD.decode(text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
