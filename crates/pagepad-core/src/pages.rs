//! Page sequence and navigation.

/// An encoded page image, as produced by a `PageCodec`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(Vec<u8>);

impl EncodedImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedImage({} bytes)", self.0.len())
    }
}

/// A single document page. A page without an image is blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    image: Option<EncodedImage>,
}

impl Page {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_image(image: EncodedImage) -> Self {
        Self { image: Some(image) }
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.image.is_none()
    }
}

/// Ordered pages plus the index of the page shown on the surface.
///
/// Always holds at least one page and `current < pages.len()`.
#[derive(Debug, Clone)]
pub struct PageBook {
    pages: Vec<Page>,
    current: usize,
}

impl Default for PageBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBook {
    /// A book with a single blank page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::blank()],
            current: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Page {
        &self.pages[self.current]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Overwrite the current page's image.
    pub fn store_current(&mut self, image: EncodedImage) {
        self.pages[self.current] = Page::with_image(image);
    }

    /// Move forward one page, appending a blank page when moving past the
    /// end. Returns true if a page was created.
    pub fn advance(&mut self) -> bool {
        self.current += 1;
        if self.current >= self.pages.len() {
            self.pages.push(Page::blank());
            true
        } else {
            false
        }
    }

    /// Move back one page. Returns false (and stays put) on the first page.
    pub fn retreat(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }
}
