use std::collections::BTreeMap;

use crate::{
    convert::{
        backend::{BackendDescriptor, BackendKind, RasterBackend},
        browser::ChromeBackend,
        inkscape::InkscapeBackend,
        native::ResvgBackend,
        options::ConversionRequest,
        rsvg::RsvgBackend,
    },
    foundation::error::{SpriteError, SpriteResult},
};

/// Builds a backend instance for a request. Construction must be cheap and side-effect free;
/// expensive setup happens lazily on first conversion.
pub type BackendFactory = fn(ConversionRequest) -> Box<dyn RasterBackend>;

/// Identifier → factory table.
///
/// Constructed once by the caller and passed explicitly; there is no process-wide registry.
#[derive(Clone, Default)]
pub struct SpriteRegistry {
    factories: BTreeMap<String, BackendFactory>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four built-in backends.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        for kind in BackendKind::ALL {
            reg.register(kind.id(), builtin_factory(kind));
        }
        reg
    }

    /// Register (or replace) a factory under `identifier`.
    pub fn register(&mut self, identifier: impl Into<String>, factory: BackendFactory) {
        self.factories.insert(identifier.into(), factory);
    }

    /// Registered identifiers in sorted order.
    pub fn identifiers(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    fn factory(&self, identifier: &str) -> SpriteResult<BackendFactory> {
        self.factories
            .get(identifier)
            .copied()
            .ok_or_else(|| SpriteError::UnknownBackend {
                backend: identifier.to_string(),
            })
    }

    /// Build a backend and verify it can run on this host.
    ///
    /// An unavailable backend is reported as `UnavailableBackend` rather than handed out broken.
    pub fn create(
        &self,
        identifier: &str,
        request: ConversionRequest,
    ) -> SpriteResult<Box<dyn RasterBackend>> {
        let backend = self.factory(identifier)?(request);
        backend
            .check_availability()
            .map_err(|reason| SpriteError::UnavailableBackend {
                backend: identifier.to_string(),
                reason: reason.to_string(),
            })?;
        tracing::debug!(backend = identifier, "created raster backend");
        Ok(backend)
    }

    /// Identifiers whose availability check passes, sorted.
    pub fn list_available(&self, request: ConversionRequest) -> Vec<String> {
        self.factories
            .iter()
            .filter(|(_, factory)| factory(request).check_availability().is_ok())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Descriptor with availability computed now.
    pub fn describe(
        &self,
        identifier: &str,
        request: ConversionRequest,
    ) -> SpriteResult<BackendDescriptor> {
        let backend = self.factory(identifier)?(request);
        let available = match backend.check_availability() {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(backend = identifier, %reason, "backend unavailable");
                false
            }
        };
        Ok(BackendDescriptor {
            identifier: identifier.to_string(),
            display_name: backend.display_name().to_string(),
            description: backend.description().to_string(),
            available,
        })
    }

    /// Descriptors for every registered backend, sorted by identifier.
    pub fn describe_all(&self, request: ConversionRequest) -> Vec<BackendDescriptor> {
        self.factories
            .keys()
            .filter_map(|id| self.describe(id, request).ok())
            .collect()
    }
}

fn builtin_factory(kind: BackendKind) -> BackendFactory {
    match kind {
        BackendKind::Resvg => make_resvg,
        BackendKind::Chrome => make_chrome,
        BackendKind::Rsvg => make_rsvg,
        BackendKind::Inkscape => make_inkscape,
    }
}

fn make_resvg(req: ConversionRequest) -> Box<dyn RasterBackend> {
    Box::new(ResvgBackend::new(req))
}

fn make_chrome(req: ConversionRequest) -> Box<dyn RasterBackend> {
    Box::new(ChromeBackend::new(req))
}

fn make_rsvg(req: ConversionRequest) -> Box<dyn RasterBackend> {
    Box::new(RsvgBackend::new(req))
}

fn make_inkscape(req: ConversionRequest) -> Box<dyn RasterBackend> {
    Box::new(InkscapeBackend::new(req))
}

#[cfg(test)]
#[path = "../../tests/unit/convert/registry.rs"]
mod tests;
