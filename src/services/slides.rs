//! Google Slides REST host.
//!
//! Two calls per run, both authenticated with a bearer token:
//!
//! 1. `POST {base}/presentations` with `{"title"}` → `presentationId`
//! 2. `POST {base}/presentations/{id}:batchUpdate` with `{"requests": [...]}`
//!
//! The API applies a batchUpdate atomically: either every request succeeds
//! or none does. [`SlideOperation`]s are mapped onto the API's request
//! objects here and nowhere else.

use super::{error_body, PresentationHost};
use crate::config::{ServiceConfig, DEFAULT_SLIDES_API_URL};
use crate::error::SlidesError;
use crate::operation::{Dimension, OperationBatch, Placement, SlideOperation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    requests: Vec<Request<'a>>,
}

/// One entry of `batchUpdate.requests`; externally tagged like the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Request<'a> {
    CreateSlide(CreateSlide<'a>),
    CreateShape(CreateShape<'a>),
    InsertText(InsertText<'a>),
    UpdateTextStyle(UpdateTextStyle<'a>),
    CreateImage(CreateImage<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSlide<'a> {
    object_id: &'a str,
    insertion_index: usize,
    slide_layout_reference: LayoutReference,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutReference {
    predefined_layout: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateShape<'a> {
    object_id: &'a str,
    shape_type: &'static str,
    element_properties: ElementProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertText<'a> {
    object_id: &'a str,
    insertion_index: usize,
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTextStyle<'a> {
    object_id: &'a str,
    style: TextStyle<'a>,
    fields: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextStyle<'a> {
    font_size: ApiDimension,
    font_family: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateImage<'a> {
    object_id: &'a str,
    url: &'a str,
    element_properties: ElementProperties<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementProperties<'a> {
    page_object_id: &'a str,
    size: ApiSize,
    transform: AffineTransform,
}

#[derive(Debug, Serialize)]
struct ApiSize {
    width: ApiDimension,
    height: ApiDimension,
}

#[derive(Debug, Serialize)]
struct ApiDimension {
    magnitude: f64,
    unit: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AffineTransform {
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
    unit: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Presentation {
    presentation_id: String,
}

impl From<Dimension> for ApiDimension {
    fn from(d: Dimension) -> Self {
        Self {
            magnitude: d.magnitude,
            unit: d.unit.as_str(),
        }
    }
}

fn element_properties<'a>(page_object_id: &'a str, placement: &Placement) -> ElementProperties<'a> {
    ElementProperties {
        page_object_id,
        size: ApiSize {
            width: placement.size.width.into(),
            height: placement.size.height.into(),
        },
        transform: AffineTransform {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: placement.position.x,
            translate_y: placement.position.y,
            unit: placement.position.unit.as_str(),
        },
    }
}

fn to_request(op: &SlideOperation) -> Request<'_> {
    match op {
        SlideOperation::CreateSlide {
            slide_id,
            insertion_index,
        } => Request::CreateSlide(CreateSlide {
            object_id: slide_id.as_str(),
            insertion_index: *insertion_index,
            slide_layout_reference: LayoutReference {
                predefined_layout: "BLANK",
            },
        }),
        SlideOperation::CreateTextBox {
            box_id,
            slide_id,
            placement,
        } => Request::CreateShape(CreateShape {
            object_id: box_id.as_str(),
            shape_type: "TEXT_BOX",
            element_properties: element_properties(slide_id.as_str(), placement),
        }),
        SlideOperation::InsertText {
            box_id,
            text,
            insertion_index,
        } => Request::InsertText(InsertText {
            object_id: box_id.as_str(),
            insertion_index: *insertion_index,
            text,
        }),
        SlideOperation::SetTextStyle {
            box_id,
            font_size,
            font_family,
        } => Request::UpdateTextStyle(UpdateTextStyle {
            object_id: box_id.as_str(),
            style: TextStyle {
                font_size: (*font_size).into(),
                font_family,
            },
            fields: "fontSize,fontFamily",
        }),
        SlideOperation::CreateImage {
            image_id,
            slide_id,
            url,
            placement,
        } => Request::CreateImage(CreateImage {
            object_id: image_id.as_str(),
            url,
            element_properties: element_properties(slide_id.as_str(), placement),
        }),
    }
}

/// Serialise a batch into the `batchUpdate` request body.
pub fn batch_update_body(batch: &OperationBatch) -> serde_json::Value {
    let body = BatchUpdateRequest {
        requests: batch.iter().map(to_request).collect(),
    };
    // Serialising plain structs of strings and numbers cannot fail.
    serde_json::to_value(&body).unwrap_or_default()
}

// ── Host ─────────────────────────────────────────────────────────────────────

/// [`PresentationHost`] that publishes to Google Slides.
pub struct SlidesApiHost {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SlidesApiHost {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, services: &ServiceConfig) -> Result<Self, SlidesError> {
        let token = services.slides_access_token.as_deref().ok_or_else(|| {
            SlidesError::ServiceNotConfigured {
                service: "slides".into(),
                hint: "Set GOOGLE_SLIDES_ACCESS_TOKEN to an OAuth token with the \
                       presentations scope, or pass --dry-run."
                    .into(),
            }
        })?;
        let base = services
            .slides_api_url
            .as_deref()
            .unwrap_or(DEFAULT_SLIDES_API_URL);
        Ok(Self::new(client, base, token))
    }
}

fn rejected(detail: impl Into<String>) -> SlidesError {
    SlidesError::HostRejected {
        detail: detail.into(),
    }
}

#[async_trait]
impl PresentationHost for SlidesApiHost {
    async fn create_presentation(&self, title: &str) -> Result<String, SlidesError> {
        info!("Creating presentation '{}'", title);
        let response = self
            .client
            .post(format!("{}/presentations", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await
            .map_err(|e| rejected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejected(error_body(response).await));
        }

        let presentation: Presentation = response
            .json()
            .await
            .map_err(|e| rejected(format!("unexpected response: {e}")))?;
        debug!("Created presentation {}", presentation.presentation_id);
        Ok(presentation.presentation_id)
    }

    async fn apply_batch(
        &self,
        presentation_id: &str,
        batch: &OperationBatch,
    ) -> Result<(), SlidesError> {
        info!(
            "Applying {} operations to presentation {}",
            batch.len(),
            presentation_id
        );
        let response = self
            .client
            .post(format!(
                "{}/presentations/{}:batchUpdate",
                self.base_url, presentation_id
            ))
            .bearer_auth(&self.access_token)
            .json(&batch_update_body(batch))
            .send()
            .await
            .map_err(|e| rejected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(rejected(error_body(response).await));
        }
        Ok(())
    }

    fn presentation_url(&self, presentation_id: &str) -> Option<String> {
        Some(format!(
            "https://docs.google.com/presentation/d/{presentation_id}/edit"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::operation::ObjectId;

    fn sample_batch() -> OperationBatch {
        let layout = LayoutConfig::default();
        OperationBatch::from(vec![
            SlideOperation::CreateSlide {
                slide_id: ObjectId::new("S00001"),
                insertion_index: 0,
            },
            SlideOperation::CreateTextBox {
                box_id: ObjectId::new("T00002"),
                slide_id: ObjectId::new("S00001"),
                placement: layout.text_box,
            },
            SlideOperation::InsertText {
                box_id: ObjectId::new("T00002"),
                text: "Rust is fast.".into(),
                insertion_index: 0,
            },
            SlideOperation::SetTextStyle {
                box_id: ObjectId::new("T00002"),
                font_size: Dimension::pt(16.0),
                font_family: "Montserrat".into(),
            },
            SlideOperation::CreateImage {
                image_id: ObjectId::new("I00003"),
                slide_id: ObjectId::new("S00001"),
                url: "https://img.example/rust.png".into(),
                placement: layout.image,
            },
        ])
    }

    #[test]
    fn body_uses_api_request_names_in_order() {
        let body = batch_update_body(&sample_batch());
        let requests = body["requests"].as_array().unwrap();
        let names: Vec<&str> = requests
            .iter()
            .map(|r| r.as_object().unwrap().keys().next().unwrap().as_str())
            .collect();
        assert_eq!(
            names,
            vec!["createSlide", "createShape", "insertText", "updateTextStyle", "createImage"]
        );
    }

    #[test]
    fn create_slide_uses_blank_layout() {
        let body = batch_update_body(&sample_batch());
        let slide = &body["requests"][0]["createSlide"];
        assert_eq!(slide["objectId"], "S00001");
        assert_eq!(slide["insertionIndex"], 0);
        assert_eq!(slide["slideLayoutReference"]["predefinedLayout"], "BLANK");
    }

    #[test]
    fn text_box_geometry_is_in_points() {
        let body = batch_update_body(&sample_batch());
        let shape = &body["requests"][1]["createShape"];
        assert_eq!(shape["shapeType"], "TEXT_BOX");
        let props = &shape["elementProperties"];
        assert_eq!(props["pageObjectId"], "S00001");
        assert_eq!(props["size"]["width"]["magnitude"], 350.0);
        assert_eq!(props["size"]["width"]["unit"], "PT");
        assert_eq!(props["transform"]["translateX"], 350.0);
        assert_eq!(props["transform"]["translateY"], 100.0);
        assert_eq!(props["transform"]["scaleX"], 1.0);
        assert_eq!(props["transform"]["unit"], "PT");
    }

    #[test]
    fn style_and_image_requests() {
        let body = batch_update_body(&sample_batch());
        let style = &body["requests"][3]["updateTextStyle"];
        assert_eq!(style["style"]["fontSize"]["magnitude"], 16.0);
        assert_eq!(style["style"]["fontFamily"], "Montserrat");
        assert_eq!(style["fields"], "fontSize,fontFamily");

        let image = &body["requests"][4]["createImage"];
        assert_eq!(image["url"], "https://img.example/rust.png");
        assert_eq!(image["elementProperties"]["size"]["height"]["unit"], "EMU");
        assert_eq!(image["elementProperties"]["transform"]["translateX"], 100_000.0);
    }

    #[test]
    fn presentation_url_points_at_editor() {
        let host = SlidesApiHost::new(reqwest::Client::new(), "https://slides.example/v1/", "t");
        assert_eq!(host.base_url, "https://slides.example/v1");
        assert_eq!(
            host.presentation_url("abc").unwrap(),
            "https://docs.google.com/presentation/d/abc/edit"
        );
    }

    #[test]
    fn from_config_needs_token() {
        let err = SlidesApiHost::from_config(reqwest::Client::new(), &ServiceConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("--dry-run"));
    }
}
