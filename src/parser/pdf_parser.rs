//! PDF document parser: positioned fragments, images and page text.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use rayon::prelude::*;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::{ImageBlock, Metadata, PositionedFragment};
use crate::report::{Warning, WarningKind};

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::{ContentInterpreter, ImageAnchor};
use super::options::{PageSelection, ParseOptions};
use super::source::{FragmentSource, ImageSource, PageText, PlacedImage, PlainTextSource, SourcePage};

/// PDF document parser.
///
/// Generic over the backend so the extraction logic can be exercised
/// without a real PDF library underneath.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap a backend.
    pub fn with_backend(backend: B, options: ParseOptions) -> Self {
        if backend.metadata().encrypted {
            log::warn!("Document is encrypted; text may not be recoverable");
        }
        Self { backend, options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Total pages in the document, regardless of selection.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Pages chosen by the page selection, in page order.
    fn selected_pages(&self) -> Result<Vec<(u32, PageId)>> {
        let pages = self.backend.pages();
        let total = pages.len() as u32;

        if let PageSelection::Pages(list) = &self.options.pages {
            if let Some(&missing) = list.iter().find(|&&p| p > total) {
                return Err(Error::PageOutOfRange(missing, total));
            }
        }

        let selected: Vec<(u32, PageId)> = pages
            .into_iter()
            .filter(|(number, _)| self.options.pages.includes(*number))
            .collect();

        if let Some(limit) = self.options.max_pages {
            if selected.len() > limit {
                return Err(Error::BudgetExceeded {
                    what: "page",
                    limit,
                    actual: selected.len(),
                });
            }
        }
        Ok(selected)
    }

    /// Run `f` over the selected pages, in parallel when enabled, keeping
    /// page order in the result.
    fn map_pages<T, F>(&self, pages: &[(u32, PageId)], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(u32, PageId) -> T + Sync + Send,
    {
        if self.options.parallel && pages.len() > 1 {
            pages.par_iter().map(|&(n, id)| f(n, id)).collect()
        } else {
            pages.iter().map(|&(n, id)| f(n, id)).collect()
        }
    }

    /// Read one page: fragments in page space plus anchored images.
    fn read_page(&self, number: u32, id: PageId) -> Result<SourcePage> {
        let page_box = self.backend.page_box(id);
        let fonts = self.backend.page_fonts(id)?;
        let content = self.backend.page_content(id)?;
        let ops = self.backend.decode_content(&content)?;

        let interpreted = ContentInterpreter::new(&self.backend, id, fonts).interpret(&ops);

        let fragments: Vec<PositionedFragment> = interpreted
            .fragments
            .into_iter()
            .filter(|f| !f.is_blank() && f.has_finite_geometry())
            .map(|mut f| {
                f.x -= page_box.llx;
                f.y -= page_box.lly;
                f
            })
            .collect();

        let mut page = SourcePage::new(number, page_box.width(), page_box.height())
            .with_fragments(fragments);

        if self.options.extract_images {
            let anchors: HashMap<Vec<u8>, ImageAnchor> = interpreted
                .image_anchors
                .into_iter()
                .rev()
                .map(|a| (a.name.clone(), a))
                .collect();
            self.place_images(&mut page, id, &anchors);
        }

        log::debug!(
            "page {}: {} fragments, {} images",
            number,
            page.fragments.len(),
            page.images.len()
        );
        Ok(page)
    }

    /// Attach the image XObjects painted on the page.
    fn place_images(
        &self,
        page: &mut SourcePage,
        id: PageId,
        anchors: &HashMap<Vec<u8>, ImageAnchor>,
    ) {
        let xobjects = match self.backend.page_images(id) {
            Ok(x) => x,
            Err(e) => {
                page.warnings.push(skipped(page.number, format!("image resources: {}", e)));
                return;
            }
        };

        let lly = self.backend.page_box(id).lly;
        let mut placed: Vec<(f32, PlacedImage)> = Vec::new();
        for xobject in xobjects {
            // resources may be shared between pages; only painted images count
            let anchor = match anchors.get(&xobject.name) {
                Some(a) => a,
                None => continue,
            };
            let name = String::from_utf8_lossy(&xobject.name).to_string();
            match xobject.into_block(page.number) {
                Ok(block) => placed.push((
                    anchor.top,
                    PlacedImage {
                        top: Some(anchor.top - lly),
                        block,
                    },
                )),
                Err(e) => page
                    .warnings
                    .push(skipped(page.number, format!("image {}: {}", name, e))),
            }
        }

        // top of page first
        placed.sort_by(|a, b| b.0.total_cmp(&a.0));
        page.images = placed.into_iter().map(|(_, image)| image).collect();
    }
}

fn skipped(page: u32, message: String) -> Warning {
    log::warn!("page {}: {}", page, message);
    Warning {
        kind: WarningKind::ImageSkipped,
        page: Some(page),
        message,
    }
}

impl<B: PdfBackend> FragmentSource for PdfParser<B> {
    fn fragment_pages(&self) -> Result<Vec<SourcePage>> {
        let selected = self.selected_pages()?;
        let results = self.map_pages(&selected, |number, id| (number, id, self.read_page(number, id)));

        let mut pages = Vec::with_capacity(results.len());
        for (number, id, result) in results {
            match result {
                Ok(page) => pages.push(page),
                Err(e) if self.options.is_strict() => return Err(e),
                Err(e) => {
                    let message = format!("unreadable page skipped: {}", e);
                    log::warn!("page {}: {}", number, message);
                    let page_box = self.backend.page_box(id);
                    let mut page = SourcePage::new(number, page_box.width(), page_box.height());
                    page.warnings.push(Warning {
                        kind: WarningKind::PageSkipped,
                        page: Some(number),
                        message,
                    });
                    pages.push(page);
                }
            }
        }

        if let Some(limit) = self.options.max_fragments {
            let actual: usize = pages.iter().map(|p| p.fragments.len()).sum();
            if actual > limit {
                return Err(Error::BudgetExceeded {
                    what: "fragment",
                    limit,
                    actual,
                });
            }
        }

        Ok(pages)
    }

    fn metadata(&self) -> Metadata {
        self.backend.metadata()
    }
}

impl<B: PdfBackend> ImageSource for PdfParser<B> {
    fn images(&self) -> Result<Vec<ImageBlock>> {
        let selected = self.selected_pages()?;
        let per_page = self.map_pages(&selected, |number, id| {
            let xobjects = match self.backend.page_images(id) {
                Ok(x) => x,
                Err(e) => {
                    log::warn!("page {}: image resources: {}", number, e);
                    return Vec::new();
                }
            };
            xobjects
                .into_iter()
                .filter_map(|x| match x.into_block(number) {
                    Ok(block) => Some(block),
                    Err(e) => {
                        log::warn!("page {}: {}", number, e);
                        None
                    }
                })
                .collect::<Vec<_>>()
        });
        Ok(per_page.into_iter().flatten().collect())
    }
}

impl<B: PdfBackend> PlainTextSource for PdfParser<B> {
    fn text_pages(&self) -> Result<Vec<PageText>> {
        let selected = self.selected_pages()?;
        let results = self.map_pages(&selected, |number, _| self.backend.page_text(number));

        let mut pages = Vec::with_capacity(results.len());
        for ((number, id), result) in selected.into_iter().zip(results) {
            let text = match result {
                Ok(text) => text,
                Err(e) if self.options.is_strict() => return Err(e),
                Err(e) => {
                    log::warn!("page {}: {}", number, e);
                    String::new()
                }
            };
            let page_box = self.backend.page_box(id);
            pages.push(PageText {
                number,
                width: page_box.width(),
                height: page_box.height(),
                text,
            });
        }
        Ok(pages)
    }
}
