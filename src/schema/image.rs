//! Registered image data

use super::entity::MinimalEntityInfo;
use serde::{Deserialize, Serialize};

/// Renderable representations an image can be turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Skeleton,
    Mesh,
    Volume,
}

/// One image registered to a template space.
///
/// The raw-format handles are optional and partly substitutable: a mesh can be
/// produced from an OBJ file or, failing that, from the SWC skeleton; a volume
/// from NRRD or WLZ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Storage location all format files hang off
    pub image_folder: String,
    pub template_channel: MinimalEntityInfo,
    pub template_anatomy: MinimalEntityInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_nrrd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_swc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_obj: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_wlz: Option<String>,
}

fn present(handle: &Option<String>) -> Option<&str> {
    handle.as_deref().filter(|s| !s.is_empty())
}

impl Image {
    /// The source URI to derive `format` from, in order of preference.
    pub fn source_for(&self, format: ImageFormat) -> Option<&str> {
        match format {
            ImageFormat::Skeleton => present(&self.image_swc),
            ImageFormat::Mesh => present(&self.image_obj).or_else(|| present(&self.image_swc)),
            ImageFormat::Volume => present(&self.image_nrrd).or_else(|| present(&self.image_wlz)),
        }
    }

    pub fn can_derive(&self, format: ImageFormat) -> bool {
        self.source_for(format).is_some()
    }

    /// Formats derivable from this image, in skeleton/mesh/volume order.
    pub fn available_formats(&self) -> Vec<ImageFormat> {
        [ImageFormat::Skeleton, ImageFormat::Mesh, ImageFormat::Volume]
            .into_iter()
            .filter(|f| self.can_derive(*f))
            .collect()
    }

    /// Template this image is aligned to
    pub fn template_id(&self) -> &str {
        &self.template_anatomy.short_form
    }
}

/// An image bound to its acquisition channel and technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelImage {
    pub image: Image,
    pub channel: MinimalEntityInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imaging_technique: Option<MinimalEntityInfo>,
}

/// An example image of some anatomy, as recorded on class documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnatomyChannelImage {
    pub anatomy: MinimalEntityInfo,
    pub channel_image: ChannelImage,
}

/// Group channel images by template, keeping first-seen template order.
pub fn group_by_template(images: &[ChannelImage]) -> Vec<(String, Vec<&ChannelImage>)> {
    let mut groups: Vec<(String, Vec<&ChannelImage>)> = Vec::new();
    for ci in images {
        let template = ci.image.template_id();
        match groups.iter_mut().find(|(t, _)| t == template) {
            Some((_, members)) => members.push(ci),
            None => groups.push((template.to_string(), vec![ci])),
        }
    }
    groups
}
