use std::sync::Arc;

use async_trait::async_trait;
use historia_api::{Photo, PhotoSearchClient, PhotoSearchError, SearchParams};
use historia_types::{Attribution, HeaderConfig, ImageResolution, ImageSourceKind, RemoteSearchConfig, SiteConfig};
use tracing::{debug, warn};

/// Strategy resolving the background image of a page.
///
/// Resolution never fails: every error path degrades to a default image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn resolve(&self, page_id: &str) -> ImageResolution;

    /// Whether resolutions may carry a photographer credit, in which case the
    /// header renders an attribution block.
    fn provides_attribution(&self) -> bool {
        false
    }
}

/// Local assets: `<image_path><file>` from the header's image table.
#[derive(Debug, Clone)]
pub struct StaticImageSource {
    header: HeaderConfig,
}

impl StaticImageSource {
    pub fn new(header: HeaderConfig) -> Self {
        Self { header }
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn resolve(&self, page_id: &str) -> ImageResolution {
        ImageResolution::plain(self.header.image_url_for(page_id))
    }
}

/// Photo lookup used by [`RemoteImageSource`].
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    async fn first_photo(&self, query: &str, params: &SearchParams) -> Result<Photo, PhotoSearchError>;
}

#[async_trait]
impl PhotoSearch for PhotoSearchClient {
    async fn first_photo(&self, query: &str, params: &SearchParams) -> Result<Photo, PhotoSearchError> {
        PhotoSearchClient::first_photo(self, query, params).await
    }
}

/// Remote photo search with a fixed fallback image.
pub struct RemoteImageSource<S = PhotoSearchClient> {
    config: RemoteSearchConfig,
    search: Option<S>,
}

impl RemoteImageSource<PhotoSearchClient> {
    /// Builds the HTTP client when a usable access key is configured. Without
    /// one, every resolution returns the default image and no request is made.
    pub fn from_config(config: RemoteSearchConfig) -> Self {
        let search = config.usable_access_key().and_then(|key| {
            PhotoSearchClient::new(&config.api_url, key)
                .map_err(|error| warn!(%error, "photo search disabled"))
                .ok()
        });
        Self { config, search }
    }
}

impl<S: PhotoSearch> RemoteImageSource<S> {
    pub fn with_search(config: RemoteSearchConfig, search: S) -> Self {
        Self {
            config,
            search: Some(search),
        }
    }

    fn params(&self) -> SearchParams {
        SearchParams {
            orientation: self.config.orientation.clone(),
            per_page: self.config.per_page,
        }
    }

    fn fallback(&self) -> ImageResolution {
        ImageResolution::plain(self.config.default_image_url.clone())
    }
}

#[async_trait]
impl<S: PhotoSearch> ImageSource for RemoteImageSource<S> {
    async fn resolve(&self, page_id: &str) -> ImageResolution {
        let search = match &self.search {
            Some(search) if self.config.usable_access_key().is_some() => search,
            _ => {
                debug!(page = page_id, "no photo search access key; using default image");
                return self.fallback();
            }
        };
        let query = self.config.search_term_for(page_id);
        match search.first_photo(query, &self.params()).await {
            Ok(photo) => ImageResolution {
                url: self.config.sized_image_url(&photo.urls.regular),
                attribution: Some(Attribution {
                    name: photo.user.name,
                    profile_url: photo.user.links.html,
                }),
            },
            Err(error) => {
                warn!(%error, page = page_id, query, "photo search failed; using default image");
                self.fallback()
            }
        }
    }

    fn provides_attribution(&self) -> bool {
        true
    }
}

/// Image source selected by the site configuration.
pub fn image_source_for(site: &SiteConfig) -> Arc<dyn ImageSource> {
    match site.image_source {
        ImageSourceKind::Static => Arc::new(StaticImageSource::new(site.header.clone())),
        ImageSourceKind::Remote => Arc::new(RemoteImageSource::from_config(site.remote.clone())),
    }
}
