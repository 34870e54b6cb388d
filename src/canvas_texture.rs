use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

/// GPU copy of the on-screen canvas pixmap.
///
/// Re-uploads only when the editor reports a new frame version.
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    uploaded_version: Option<u64>,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure the texture holds frame `version` of `image` and returns it.
    pub fn sync(&mut self, ctx: &Context, image: &RgbaImage, version: u64) -> Option<&TextureHandle> {
        if self.handle.is_none() || self.uploaded_version != Some(version) {
            let size = [image.width() as usize, image.height() as usize];
            let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
            match &mut self.handle {
                Some(handle) => handle.set(color_image, TextureOptions::NEAREST),
                None => {
                    self.handle = Some(ctx.load_texture(
                        "sketchpad_canvas",
                        color_image,
                        TextureOptions::NEAREST,
                    ));
                }
            }
            log::trace!("Uploaded canvas frame {version}");
            self.uploaded_version = Some(version);
        }
        self.handle.as_ref()
    }

    pub fn uploaded_version(&self) -> Option<u64> {
        self.uploaded_version
    }
}
