//! Converts legacy rich-text markup into block-structured portable rich text.
//!
//! Legacy exports express structure loosely: paragraphs may or may not be
//! wrapped, captions and galleries are bracketed shortcodes, and embeds
//! arrive as bare URLs, `[embed]` shortcodes, or host-specific script tags.
//! Conversion runs as a staged pipeline:
//!
//! 1. [`normalize`] rewrites every embed idiom into a canonical placeholder
//!    element (pure text-to-text, idempotent);
//! 2. the markup is parsed into a minimal element/text tree;
//! 3. [`TreeCompiler`] walks the tree into an ordered sequence of typed
//!    blocks, resolving images and gallery attachments through
//!    caller-injected [`Resolvers`] and embed URLs through the
//!    [`platform`] resolver.
//!
//! The result is a [`Document`] plus a [`Report`] of anything that had to be
//! dropped; [`Document::to_portable`] serializes it as the consumer's
//! block-array shape. Nothing in the pipeline is fatal: malformed input
//! degrades to literal text and a document always comes back.

pub mod compiler;
pub mod document;
pub mod markup;
pub mod normalizer;
pub mod platform;
pub mod resolve;
mod serialize;

pub use compiler::TreeCompiler;
pub use document::{
    Block, Document, Embed, Image, ListKind, Mark, Paragraph, ParagraphStyle, Span,
};
pub use normalizer::normalize;
pub use platform::{EmbedResolution, Platform};
pub use resolve::{Attachment, AttachmentResolver, AssetResolver, NoResolution, Report, Resolvers};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A converted document together with its drop report.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: Document,
    pub report: Report,
}

/// Convert one legacy markup string into a block document.
///
/// # Examples
///
/// ```no_run
/// use portage::{Resolvers, convert};
///
/// let assets = |url: &str| Some(format!("image-{}", url.len()));
/// let resolvers = Resolvers::new(&assets, &portage::NoResolution);
///
/// let conversion = convert("<p>Hello <em>world</em></p>", &resolvers);
/// let blocks = conversion.document.to_portable();
/// ```
pub fn convert(input: &str, resolvers: &Resolvers) -> Conversion {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let normalized = normalizer::normalize(input);
    let (document, report) = compiler::TreeCompiler::new(resolvers).compile(&normalized);
    Conversion { document, report }
}
