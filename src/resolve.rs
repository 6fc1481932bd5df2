//! Caller-injected resolution and the conversion report.
//!
//! The compiler never performs I/O itself: turning an image URL into an
//! uploaded asset reference, and a gallery attachment id into its source URL,
//! are the caller's business. Both hooks are traits blanket-implemented for
//! closures, so tests run deterministic and network-free.

/// Resolves a source image URL to an asset reference in the destination
/// store. `None` means the image could not be resolved; the offending block
/// is dropped and counted, never a hard failure.
pub trait AssetResolver {
    fn resolve_asset(&self, url: &str) -> Option<String>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_asset(&self, url: &str) -> Option<String> {
        self(url)
    }
}

/// A legacy media-library attachment, looked up by numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
}

/// Resolves a numeric attachment id from a gallery shortcode.
pub trait AttachmentResolver {
    fn resolve_attachment(&self, id: u64) -> Option<Attachment>;
}

impl<F> AttachmentResolver for F
where
    F: Fn(u64) -> Option<Attachment>,
{
    fn resolve_attachment(&self, id: u64) -> Option<Attachment> {
        self(id)
    }
}

/// A resolver that never resolves anything. Useful for text-only imports and
/// for exercising the skip paths.
pub struct NoResolution;

impl AssetResolver for NoResolution {
    fn resolve_asset(&self, _url: &str) -> Option<String> {
        None
    }
}

impl AttachmentResolver for NoResolution {
    fn resolve_attachment(&self, _id: u64) -> Option<Attachment> {
        None
    }
}

/// The pair of lookups a conversion needs.
pub struct Resolvers<'a> {
    pub assets: &'a dyn AssetResolver,
    pub attachments: &'a dyn AttachmentResolver,
}

impl<'a> Resolvers<'a> {
    pub fn new(assets: &'a dyn AssetResolver, attachments: &'a dyn AttachmentResolver) -> Self {
        Resolvers { assets, attachments }
    }

    /// Resolvers that resolve nothing.
    pub fn none() -> Resolvers<'static> {
        Resolvers {
            assets: &NoResolution,
            attachments: &NoResolution,
        }
    }
}

/// Counts of content the conversion had to drop. Failures are never
/// signalled through control flow, since a document always comes back;
/// callers that care read these counters (each drop is also logged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Report {
    /// Images whose URL the asset resolver could not resolve.
    pub images_skipped: u32,
    /// Gallery identifiers that failed attachment or asset resolution.
    pub gallery_items_skipped: u32,
    /// Embed placeholders whose URL resolved to no known platform.
    pub embeds_skipped: u32,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        *self == Report::default()
    }
}
