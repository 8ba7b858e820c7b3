//! Embed URL construction for third-party video providers
//!
//! Each provider is one row in a table: id, display name and a builder
//! function. Builders only ever see a validated [`EmbedTarget`], so a tv
//! request without season/episode is rejected before any URL is formatted.

use lunastream_config::{PlayerConfig, DEFAULT_PROVIDER, DEFAULT_THEME_COLOR};
use lunastream_models::EmbedMediaType;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("tv playback needs both season and episode (got season={season:?}, episode={episode:?})")]
    MissingEpisode { season: Option<u32>, episode: Option<u32> },
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}

/// What the user asked to play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedRequest {
    pub media_type: EmbedMediaType,
    pub tmdb_id: u64,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl EmbedRequest {
    pub fn movie(tmdb_id: u64) -> Self {
        Self { media_type: EmbedMediaType::Movie, tmdb_id, season: None, episode: None }
    }

    pub fn tv(tmdb_id: u64, season: u32, episode: u32) -> Self {
        Self {
            media_type: EmbedMediaType::Tv,
            tmdb_id,
            season: Some(season),
            episode: Some(episode),
        }
    }
}

/// A request with every field its media type needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedTarget {
    Movie { tmdb_id: u64 },
    Episode { tmdb_id: u64, season: u32, episode: u32 },
}

impl TryFrom<&EmbedRequest> for EmbedTarget {
    type Error = ResolveError;

    fn try_from(request: &EmbedRequest) -> Result<Self, Self::Error> {
        match request.media_type {
            EmbedMediaType::Movie => Ok(EmbedTarget::Movie { tmdb_id: request.tmdb_id }),
            EmbedMediaType::Tv => match (request.season, request.episode) {
                (Some(season), Some(episode)) => Ok(EmbedTarget::Episode {
                    tmdb_id: request.tmdb_id,
                    season,
                    episode,
                }),
                (season, episode) => Err(ResolveError::MissingEpisode { season, episode }),
            },
        }
    }
}

impl EmbedTarget {
    /// `movie/{id}` or `tv/{id}/{season}/{episode}`
    fn path(&self) -> String {
        match self {
            EmbedTarget::Movie { tmdb_id } => format!("movie/{}", tmdb_id),
            EmbedTarget::Episode { tmdb_id, season, episode } => {
                format!("tv/{}/{}/{}", tmdb_id, season, episode)
            }
        }
    }
}

pub type UrlBuilder = fn(&EmbedTarget, &str) -> String;

#[derive(Debug, Clone, Copy)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
    pub build: UrlBuilder,
}

fn videasy(target: &EmbedTarget, color: &str) -> String {
    format!(
        "https://player.videasy.net/{}?color={}&chromecast=false&nextEpisode=true&autoplayNextEpisode=true",
        target.path(),
        color
    )
}

fn vidify(target: &EmbedTarget, color: &str) -> String {
    format!(
        "https://player.vidify.top/embed/{}?primarycolor={}&chromecast=false&poster=true",
        target.path(),
        color
    )
}

fn vidplus(target: &EmbedTarget, color: &str) -> String {
    format!(
        "https://player.vidplus.to/embed/{}?primarycolor={}&chromecast=false&nextButton=true&autoNext=true",
        target.path(),
        color
    )
}

fn vidfast(target: &EmbedTarget, color: &str) -> String {
    format!(
        "https://vidfast.pro/{}?theme={}&chromecast=false&nextButton=true&autoNext=true&poster=true",
        target.path(),
        color
    )
}

pub const BUILTIN_PROVIDERS: &[Provider] = &[
    Provider { id: "videasy", name: "Videasy", build: videasy },
    Provider { id: "vidify", name: "Vidify", build: vidify },
    Provider { id: "vidplus", name: "VidPlus", build: vidplus },
    Provider { id: "vidfast", name: "VidFast", build: vidfast },
];

/// Provider table plus the settings shared by every URL
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    default_id: &'static str,
    theme_color: String,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    pub fn builtin() -> Self {
        Self {
            providers: BUILTIN_PROVIDERS.to_vec(),
            default_id: DEFAULT_PROVIDER,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
        }
    }

    /// Built-in table configured from `[player]`
    ///
    /// An unknown `default_provider` is logged and the built-in default kept.
    pub fn from_config(config: &PlayerConfig) -> Self {
        let mut registry = Self::builtin().with_theme_color(&config.theme_color);
        if let Err(e) = registry.set_default(&config.default_provider) {
            warn!("Ignoring configured default provider: {}", e);
        }
        registry
    }

    pub fn with_theme_color(mut self, color: &str) -> Self {
        self.theme_color = color.trim_start_matches('#').to_string();
        self
    }

    /// Add a provider, replacing any existing one with the same id
    pub fn register(&mut self, provider: Provider) {
        match self.providers.iter_mut().find(|p| p.id == provider.id) {
            Some(existing) => *existing = provider,
            None => self.providers.push(provider),
        }
    }

    pub fn set_default(&mut self, id: &str) -> Result<(), ResolveError> {
        let provider_id = self
            .get(id)
            .map(|p| p.id)
            .ok_or_else(|| ResolveError::UnknownProvider(id.to_string()))?;
        self.default_id = provider_id;
        Ok(())
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    pub fn default_provider(&self) -> &Provider {
        self.get(self.default_id).unwrap_or(&BUILTIN_PROVIDERS[0])
    }

    /// Provider for `id`, or the default one when `id` is not registered
    pub fn provider_or_default(&self, id: &str) -> &Provider {
        match self.get(id) {
            Some(provider) => provider,
            None => {
                debug!("Unknown provider '{}', falling back to {}", id, self.default_id);
                self.default_provider()
            }
        }
    }

    pub fn resolve(&self, provider_id: &str, request: &EmbedRequest) -> Result<String, ResolveError> {
        let target = EmbedTarget::try_from(request)?;
        let provider = self.provider_or_default(provider_id);
        let color = urlencoding::encode(&self.theme_color);
        Ok((provider.build)(&target, &color))
    }
}

/// Resolve against the built-in table and default colour
pub fn resolve(provider_id: &str, request: &EmbedRequest) -> Result<String, ResolveError> {
    ProviderRegistry::builtin().resolve(provider_id, request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_urls_contain_id_for_every_provider() {
        for provider in BUILTIN_PROVIDERS {
            let url = resolve(provider.id, &EmbedRequest::movie(550)).unwrap();
            assert!(url.starts_with("https://"), "{}", url);
            assert!(url.contains("/movie/550?"), "{}", url);
            assert!(url.contains("fbc9ff"), "{}", url);
        }
    }

    #[test]
    fn test_tv_urls_contain_season_and_episode() {
        for provider in BUILTIN_PROVIDERS {
            let url = resolve(provider.id, &EmbedRequest::tv(1399, 3, 9)).unwrap();
            assert!(url.contains("/tv/1399/3/9?"), "{}", url);
        }
    }

    #[test]
    fn test_exact_templates() {
        assert_eq!(
            resolve("videasy", &EmbedRequest::movie(42)).unwrap(),
            "https://player.videasy.net/movie/42?color=fbc9ff&chromecast=false&nextEpisode=true&autoplayNextEpisode=true"
        );
        assert_eq!(
            resolve("vidify", &EmbedRequest::tv(7, 1, 2)).unwrap(),
            "https://player.vidify.top/embed/tv/7/1/2?primarycolor=fbc9ff&chromecast=false&poster=true"
        );
        assert_eq!(
            resolve("vidplus", &EmbedRequest::movie(42)).unwrap(),
            "https://player.vidplus.to/embed/movie/42?primarycolor=fbc9ff&chromecast=false&nextButton=true&autoNext=true"
        );
        assert_eq!(
            resolve("vidfast", &EmbedRequest::tv(7, 1, 2)).unwrap(),
            "https://vidfast.pro/tv/7/1/2?theme=fbc9ff&chromecast=false&nextButton=true&autoNext=true&poster=true"
        );
    }

    #[test]
    fn test_tv_without_episode_is_an_error() {
        let mut request = EmbedRequest::tv(7, 1, 2);
        request.episode = None;
        assert_eq!(
            resolve("videasy", &request),
            Err(ResolveError::MissingEpisode { season: Some(1), episode: None })
        );

        request.season = None;
        for provider in BUILTIN_PROVIDERS {
            assert!(resolve(provider.id, &request).is_err());
        }
    }

    #[test]
    fn test_unknown_provider_falls_back_to_default() {
        let fallback = resolve("nope", &EmbedRequest::movie(1)).unwrap();
        assert_eq!(fallback, resolve("videasy", &EmbedRequest::movie(1)).unwrap());

        let mut registry = ProviderRegistry::builtin();
        registry.set_default("vidfast").unwrap();
        assert!(registry.resolve("nope", &EmbedRequest::movie(1)).unwrap().starts_with("https://vidfast.pro/"));
    }

    #[test]
    fn test_register_new_provider() {
        fn example(target: &EmbedTarget, color: &str) -> String {
            format!("https://example.test/{}?c={}", target.path(), color)
        }

        let mut registry = ProviderRegistry::builtin().with_theme_color("#00ff00");
        registry.register(Provider { id: "example", name: "Example", build: example });

        assert_eq!(registry.providers().len(), BUILTIN_PROVIDERS.len() + 1);
        assert_eq!(
            registry.resolve("example", &EmbedRequest::tv(3, 1, 1)).unwrap(),
            "https://example.test/tv/3/1/1?c=00ff00"
        );
    }

    #[test]
    fn test_from_config_ignores_unknown_default() {
        let config = PlayerConfig { default_provider: "missing".into(), theme_color: "123456".into() };
        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(registry.default_provider().id, "videasy");
        assert!(registry.resolve("vidify", &EmbedRequest::movie(1)).unwrap().contains("primarycolor=123456"));
    }

    #[test]
    fn test_provider_lookup_is_case_insensitive() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.get("VidFast").map(|p| p.name), Some("VidFast"));
    }
}
