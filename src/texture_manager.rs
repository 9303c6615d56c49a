use std::collections::HashMap;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// Keeps one GPU texture per named slot ("canvas", "preview", a project
/// thumbnail...) and re-uploads it only when the slot's version changes.
#[derive(Default)]
pub struct TextureManager {
    slots: HashMap<String, CachedTexture>,
}

struct CachedTexture {
    version: u64,
    handle: TextureHandle,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the texture for `slot`, uploading the generator's image when the
    /// slot is empty or holds an older version
    pub fn get_or_update<F>(&mut self, ctx: &Context, slot: &str, version: u64, generator: F) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        if let Some(cached) = self.slots.get_mut(slot) {
            if cached.version != version {
                log::debug!("Refreshing texture {} (v{} -> v{})", slot, cached.version, version);
                cached.handle.set(generator(), TextureOptions::LINEAR);
                cached.version = version;
            }
            return cached.handle.id();
        }

        let handle = ctx.load_texture(slot, generator(), TextureOptions::LINEAR);
        let id = handle.id();
        self.slots.insert(slot.to_owned(), CachedTexture { version, handle });
        id
    }

    /// Pixel size of the texture held in `slot`
    pub fn size(&self, slot: &str) -> Option<[usize; 2]> {
        self.slots.get(slot).map(|cached| cached.handle.size())
    }

    /// Drop a slot so its texture is freed
    pub fn invalidate(&mut self, slot: &str) {
        self.slots.remove(slot);
    }

    /// Drop every slot whose name starts with `prefix`
    pub fn invalidate_prefix(&mut self, prefix: &str) {
        self.slots.retain(|slot, _| !slot.starts_with(prefix));
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(gray: u8) -> ColorImage {
        ColorImage::new([2, 2], egui::Color32::from_gray(gray))
    }

    #[test]
    fn test_reuses_texture_for_same_version() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();

        let first = textures.get_or_update(&ctx, "canvas", 1, || image(0));
        let mut regenerated = false;
        let second = textures.get_or_update(&ctx, "canvas", 1, || {
            regenerated = true;
            image(0)
        });

        assert_eq!(first, second);
        assert!(!regenerated);
    }

    #[test]
    fn test_new_version_keeps_slot_identity() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();

        let first = textures.get_or_update(&ctx, "preview", 1, || image(0));
        let second = textures.get_or_update(&ctx, "preview", 2, || image(255));

        assert_eq!(first, second);
        assert_eq!(textures.len(), 1);
        assert_eq!(textures.size("preview"), Some([2, 2]));
    }

    #[test]
    fn test_invalidate_prefix() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();
        textures.get_or_update(&ctx, "thumb/a", 1, || image(0));
        textures.get_or_update(&ctx, "thumb/b", 1, || image(0));
        textures.get_or_update(&ctx, "canvas", 1, || image(0));

        textures.invalidate_prefix("thumb/");

        assert_eq!(textures.len(), 1);
    }
}
