//! Browser glue: LocalStorage, DOM readouts and image loading

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::Readout;
use crate::assets::{AssetCache, AssetKey, ImageData};
use crate::persistence::{PersistError, PersistResult, Storage};

fn js_error(e: JsValue) -> PersistError {
    PersistError::Storage(format!("{e:?}"))
}

/// `window.localStorage`
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> PersistResult<Self> {
        let storage = web_sys::window()
            .ok_or(PersistError::Unavailable)?
            .local_storage()
            .map_err(js_error)?
            .ok_or(PersistError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// HUD elements of the page; missing elements are ignored
pub struct DomReadout {
    document: Document,
}

impl DomReadout {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn toggle_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if on {
                classes.add_1(class)
            } else {
                classes.remove_1(class)
            };
        }
    }
}

impl Readout for DomReadout {
    fn set_score(&mut self, score: u64) {
        self.set_text("scoreValue", &score.to_string());
    }

    fn set_high_score(&mut self, high_score: u64) {
        self.set_text("highScoreValue", &high_score.to_string());
    }

    fn set_loading_visible(&mut self, visible: bool) {
        self.toggle_class("loadingScreen", "hidden", !visible);
    }

    fn set_instructions_visible(&mut self, visible: bool) {
        self.toggle_class("instructionModal", "show", visible);
    }
}

/// Start loading `path`; resolves on `load`, rejects on `error`
fn request_image(path: &str) -> Result<(HtmlImageElement, JsFuture), JsValue> {
    let img = HtmlImageElement::new()?;
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(path);
    Ok((img, JsFuture::from(promise)))
}

/// Read back RGBA8 pixels through an offscreen 2D canvas
fn decode(document: &Document, key: AssetKey, img: &HtmlImageElement) -> Result<ImageData, JsValue> {
    let (width, height) = (img.natural_width(), img.natural_height());
    if width == 0 || height == 0 {
        return Err(JsValue::from_str("image has no pixels"));
    }

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    let pixels = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;

    Ok(ImageData {
        key,
        width,
        height,
        rgba: pixels.data().0,
    })
}

/// Load every game image as one batch
///
/// All requests start up front; the batch completes once each one has
/// settled. Failures are recorded in `cache` and never abort the batch.
pub async fn load_assets(cache: &mut AssetCache) -> Vec<ImageData> {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document; skipping image loading");
        for key in AssetKey::all() {
            cache.mark_failed(key);
        }
        return Vec::new();
    };

    let requests: Vec<_> = AssetKey::all()
        .into_iter()
        .map(|key| (key, request_image(&key.path())))
        .collect();

    let mut images = Vec::with_capacity(requests.len());
    for (key, request) in requests {
        let loaded = match request {
            Ok((img, done)) => match done.await {
                Ok(_) => decode(&document, key, &img),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        match loaded {
            Ok(image) => {
                cache.mark_ready(key, image.info());
                images.push(image);
            }
            Err(e) => {
                log::debug!("{}: {:?}", key.path(), e);
                cache.mark_failed(key);
            }
        }
    }

    let progress = cache.progress();
    log::info!(
        "Image batch settled: {}/{} loaded",
        progress.settled - progress.failed,
        progress.total
    );
    images
}
