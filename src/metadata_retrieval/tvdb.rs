/// TheTVDB API client implementation.
use super::archive::extract_flat;
use super::transport::{HttpTransport, Transport};
use super::{RemoteId, RetrievalError, TvDbApi};
use crate::ProgressEvent;
use crate::config::ClientConfig;
use crate::mirror_cache::MirrorCache;
use crate::model::{Locale, Mirror, ShowRecord, parse_document};
use crate::series_details::SeriesDetails;
use crate::temp::{create_temp_dir, create_temp_file};
use humansize::{DECIMAL, format_size};
use reqwest::Url;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// File name of the downloaded archive inside the download directory
const ARCHIVE_FILE: &str = "loaded.zip";

/// Directory the archive is extracted to inside the download directory
const EXTRACTION_DIR: &str = "extraction";

/// Client for TheTVDB XML API.
///
/// The first mirror list fetched by a client decides its default mirror
/// (see [`MirrorCache`]); requests that pass no mirror use that default.
pub struct TvDbClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
    mirrors: Mutex<MirrorCache>,
}

impl TvDbClient<HttpTransport> {
    /// Creates a client that talks HTTP
    ///
    /// # Errors
    ///
    /// Fails when the configuration has no API key or the HTTP client
    /// cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, RetrievalError> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> TvDbClient<T> {
    /// Creates a client that performs its requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, RetrievalError> {
        if config.api_key.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument {
                parameter: "api_key",
                reason: "API key must not be empty",
            });
        }

        Ok(Self {
            transport,
            config,
            mirrors: Mutex::new(MirrorCache::new()),
        })
    }

    /// The configuration this client was created with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The remembered default mirror, if a mirror list was fetched already
    pub fn default_mirror(&self) -> Option<Mirror> {
        self.mirror_cache().default_mirror().cloned()
    }

    fn mirror_cache(&self) -> std::sync::MutexGuard<'_, MirrorCache> {
        self.mirrors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn language<'a>(&'a self, language: Option<&'a str>) -> &'a str {
        language
            .filter(|language| !language.trim().is_empty())
            .unwrap_or(&self.config.default_language)
    }

    /// Base address of `mirror`, or of the default mirror when `None`
    fn mirror_address(&self, mirror: Option<&Mirror>) -> Result<String, RetrievalError> {
        if let Some(mirror) = mirror {
            return mirror
                .address
                .as_deref()
                .map(|address| address.trim_end_matches('/').to_string())
                .ok_or(RetrievalError::InvalidArgument {
                    parameter: "mirror",
                    reason: "Mirror has no address",
                });
        }

        if self.mirror_cache().default_mirror().is_none() {
            tracing::debug!("No default mirror known, fetching mirror list");
            self.mirrors()?;
        }

        self.mirror_cache()
            .default_mirror()
            .and_then(|mirror| mirror.address.as_deref())
            .map(|address| address.trim_end_matches('/').to_string())
            .ok_or(RetrievalError::NoCapableMirror)
    }

    fn fetch_text(&self, url: &Url) -> Result<String, RetrievalError> {
        let body = self.transport.fetch(url.as_str())?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn url(&self, address: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, RetrievalError> {
        let url = format!("{}/api/{}", address.trim_end_matches('/'), path);
        let parsed = if params.is_empty() {
            Url::parse(&url)
        } else {
            Url::parse_with_params(&url, params)
        };

        parsed.map_err(|e| RetrievalError::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Like [`TvDbApi::full_series_by_id`], reporting progress to `progress_callback`
    pub fn full_series_with_progress<F>(
        &self,
        id: u32,
        language: Option<&str>,
        mirror: Option<&Mirror>,
        mut progress_callback: F,
    ) -> Result<SeriesDetails, RetrievalError>
    where
        F: FnMut(ProgressEvent),
    {
        if id == 0 {
            return Err(RetrievalError::InvalidArgument {
                parameter: "id",
                reason: "Series id must not be zero",
            });
        }

        let language = self.language(language).to_string();

        progress_callback(ProgressEvent::ResolvingMirror);
        let address = self.mirror_address(mirror)?;
        progress_callback(ProgressEvent::MirrorResolved {
            address: address.clone(),
        });

        let url = self.url(
            &address,
            &format!("{}/series/{}/all/{}.zip", self.config.api_key, id, language),
            &[],
        )?;

        progress_callback(ProgressEvent::DownloadingArchive {
            series_id: id,
            language: language.clone(),
        });
        let bytes = self.transport.fetch(url.as_str())?;
        progress_callback(ProgressEvent::ArchiveDownloaded { bytes: bytes.len() });

        if !infer::archive::is_zip(&bytes) {
            return Err(RetrievalError::NotAnArchive {
                mime: infer::get(&bytes).map(|kind| kind.mime_type().to_string()),
            });
        }

        tracing::info!(
            series_id = id,
            language = %language,
            size = %format_size(bytes.len(), DECIMAL),
            "Downloaded series archive"
        );

        let details = match &self.config.download_dir {
            Some(download_dir) => {
                let archive = download_dir.join(ARCHIVE_FILE);
                let destination = download_dir.join(EXTRACTION_DIR);

                write_archive(download_dir, &archive, &bytes)?;
                reset_directory(&destination)?;

                progress_callback(ProgressEvent::ExtractingArchive {
                    destination: destination.clone(),
                });
                extract_flat(&archive, &destination)?;
                SeriesDetails::new(&destination, &language)?
            }
            None => {
                let archive = create_temp_file("tvdb_series", "zip", &bytes).map_err(|e| {
                    RetrievalError::Extraction {
                        path: std::env::temp_dir(),
                        source: e,
                    }
                })?;
                let destination = create_temp_dir("tvdb_series").map_err(|e| RetrievalError::Extraction {
                    path: std::env::temp_dir(),
                    source: e,
                })?;

                progress_callback(ProgressEvent::ExtractingArchive {
                    destination: destination.to_path_buf(),
                });
                extract_flat(&archive, &destination)?;

                // The documents are read on construction, the guards may go
                SeriesDetails::new(destination.path(), &language)?
            }
        };

        progress_callback(ProgressEvent::Loaded {
            series_id: id,
            directory: details.directory().to_path_buf(),
        });

        Ok(details)
    }
}

fn write_archive(download_dir: &Path, archive: &Path, bytes: &[u8]) -> Result<(), RetrievalError> {
    fs::create_dir_all(download_dir).map_err(|e| RetrievalError::Extraction {
        path: download_dir.to_path_buf(),
        source: e,
    })?;

    fs::write(archive, bytes).map_err(|e| RetrievalError::Extraction {
        path: archive.to_path_buf(),
        source: e,
    })
}

/// Removes a previous extraction so no stale documents survive
fn reset_directory(directory: &Path) -> Result<(), RetrievalError> {
    if directory.exists() {
        fs::remove_dir_all(directory).map_err(|e| RetrievalError::Extraction {
            path: directory.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}

impl<T: Transport> TvDbApi for TvDbClient<T> {
    fn mirrors(&self) -> Result<Vec<Mirror>, RetrievalError> {
        let url = self.url(&self.config.base_url, &format!("{}/mirrors.xml", self.config.api_key), &[])?;
        let mirrors: Vec<Mirror> = parse_document(&self.fetch_text(&url)?, "Mirror", "mirrors.xml")?;

        self.mirror_cache().remember(&mirrors);

        Ok(mirrors)
    }

    fn languages(&self, mirror: Option<&Mirror>) -> Result<Vec<Locale>, RetrievalError> {
        let address = self.mirror_address(mirror)?;
        let url = self.url(&address, &format!("{}/languages.xml", self.config.api_key), &[])?;

        let mut languages: Vec<Locale> = parse_document(&self.fetch_text(&url)?, "Language", "languages.xml")?;
        languages.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(languages)
    }

    fn series_by_name(
        &self,
        name: &str,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<Vec<ShowRecord>, RetrievalError> {
        if name.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument {
                parameter: "name",
                reason: "Series name must not be empty",
            });
        }

        let language = self.language(language);
        let address = self.mirror_address(mirror)?;
        let url = self.url(
            &address,
            "GetSeries.php",
            &[("seriesname", name.trim()), ("language", language)],
        )?;

        let shows: Vec<ShowRecord> = parse_document(&self.fetch_text(&url)?, "Series", "GetSeries.php")?;
        let total = shows.len();
        let shows: Vec<ShowRecord> = shows
            .into_iter()
            .filter(|show| {
                show.base
                    .language
                    .as_deref()
                    .is_some_and(|show_language| show_language.eq_ignore_ascii_case(language))
            })
            .collect();

        tracing::debug!(name, language, total, matching = shows.len(), "Searched series by name");

        Ok(shows)
    }

    fn series_by_remote_id(
        &self,
        remote_id: &RemoteId,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<Vec<ShowRecord>, RetrievalError> {
        if remote_id.value().trim().is_empty() {
            return Err(RetrievalError::InvalidArgument {
                parameter: "remote_id",
                reason: "Remote id must not be empty",
            });
        }

        let language = self.language(language);
        let address = self.mirror_address(mirror)?;
        let (imdb, zap2it) = match remote_id {
            RemoteId::Imdb(id) => (id.trim(), ""),
            RemoteId::Zap2It(id) => ("", id.trim()),
        };
        let url = self.url(
            &address,
            "GetSeriesByRemoteID.php",
            &[("imdbid", imdb), ("language", language), ("zap2it", zap2it)],
        )?;

        Ok(parse_document(&self.fetch_text(&url)?, "Series", "GetSeriesByRemoteID.php")?)
    }

    fn full_series_by_id(
        &self,
        id: u32,
        language: Option<&str>,
        mirror: Option<&Mirror>,
    ) -> Result<SeriesDetails, RetrievalError> {
        self.full_series_with_progress(id, language, mirror, |_| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series_details::{ARTWORK_FILE, CAST_FILE};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    const MIRRORS: &str = "<Mirrors>\
        <Mirror><id>1</id><mirrorpath>http://partial.example</mirrorpath><typemask>1</typemask></Mirror>\
        <Mirror><id>2</id><mirrorpath>http://thetvdb.com/</mirrorpath><typemask>7</typemask></Mirror>\
        </Mirrors>";

    /// Serves canned responses and records every requested URL
    #[derive(Default)]
    struct FakeTransport {
        responses: HashMap<String, Vec<u8>>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }
    }

    impl Transport for FakeTransport {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, RetrievalError> {
            self.requests.borrow_mut().push(url.to_string());
            self.responses.get(url).cloned().ok_or(RetrievalError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn config() -> ClientConfig {
        ClientConfig {
            api_key: "KEY".to_string(),
            ..Default::default()
        }
    }

    fn client(transport: FakeTransport) -> TvDbClient<FakeTransport> {
        TvDbClient::with_transport(config(), transport).unwrap()
    }

    fn series_archive() -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        let entries = [
            (CAST_FILE, "<Actors><Actor><id>1</id><Name>Nathan Fillion</Name></Actor></Actors>"),
            (ARTWORK_FILE, "<Banners><Banner><id>2</id><BannerType>poster</BannerType></Banner></Banners>"),
            (
                "en.xml",
                "<Data><Series><id>83462</id><SeriesName>Castle (2009)</SeriesName></Series>\
                 <Episode><id>398671</id><EpisodeNumber>1</EpisodeNumber></Episode></Data>",
            ),
        ];

        for (name, contents) in entries {
            writer.start_file(name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = TvDbClient::with_transport(ClientConfig::default(), FakeTransport::default());
        assert!(matches!(
            result,
            Err(RetrievalError::InvalidArgument {
                parameter: "api_key",
                ..
            })
        ));
    }

    #[test]
    fn test_mirrors_remembers_default() {
        let client = client(FakeTransport::default().with("http://thetvdb.com/api/KEY/mirrors.xml", MIRRORS));

        let mirrors = client.mirrors().unwrap();
        assert_eq!(mirrors.len(), 2);
        assert_eq!(client.default_mirror().map(|m| m.id), Some(2));
    }

    #[test]
    fn test_languages_fetches_mirrors_once_and_sorts_by_name() {
        let transport = FakeTransport::default()
            .with("http://thetvdb.com/api/KEY/mirrors.xml", MIRRORS)
            .with(
                "http://thetvdb.com/api/KEY/languages.xml",
                "<Languages>\
                 <Language><name>English</name><abbreviation>en</abbreviation><id>7</id></Language>\
                 <Language><name>Deutsch</name><abbreviation>de</abbreviation><id>14</id></Language>\
                 </Languages>",
            );
        let client = client(transport);

        let languages = client.languages(None).unwrap();
        let names: Vec<_> = languages.iter().map(|l| l.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["Deutsch", "English"]);

        client.languages(None).unwrap();
        let requests = client.transport.requests.borrow();
        let mirror_requests = requests.iter().filter(|url| url.ends_with("mirrors.xml")).count();
        assert_eq!(mirror_requests, 1);
    }

    #[test]
    fn test_no_capable_mirror() {
        let client = client(FakeTransport::default().with(
            "http://thetvdb.com/api/KEY/mirrors.xml",
            "<Mirrors><Mirror><id>1</id><mirrorpath>http://a.example</mirrorpath><typemask>3</typemask></Mirror></Mirrors>",
        ));

        assert!(matches!(client.languages(None), Err(RetrievalError::NoCapableMirror)));
    }

    #[test]
    fn test_series_by_name_filters_language() {
        let transport = FakeTransport::default().with(
            "http://mirror.example/api/GetSeries.php?seriesname=Castle+2009&language=de",
            "<Data>\
             <Series><seriesid>1</seriesid><language>en</language><SeriesName>Castle (2009)</SeriesName></Series>\
             <Series><seriesid>1</seriesid><language>de</language><SeriesName>Castle</SeriesName></Series>\
             </Data>",
        );
        let client = client(transport);
        let mirror = Mirror::new(1, "http://mirror.example");

        let shows = client.series_by_name("Castle 2009", Some("de"), Some(&mirror)).unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].base.name.as_deref(), Some("Castle"));
    }

    #[test]
    fn test_series_by_name_rejects_empty_name() {
        let client = client(FakeTransport::default());
        assert!(matches!(
            client.series_by_name(" ", None, None),
            Err(RetrievalError::InvalidArgument { parameter: "name", .. })
        ));
        assert!(client.transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_series_by_remote_id() {
        let transport = FakeTransport::default().with(
            "http://mirror.example/api/GetSeriesByRemoteID.php?imdbid=tt1219024&language=en&zap2it=",
            "<Data><Series><seriesid>83462</seriesid><IMDB_ID>tt1219024</IMDB_ID></Series></Data>",
        );
        let client = client(transport);
        let mirror = Mirror::new(1, "http://mirror.example");

        let shows = client
            .series_by_remote_id(&RemoteId::Imdb("tt1219024".to_string()), None, Some(&mirror))
            .unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].base.imdb_id.as_deref(), Some("tt1219024"));
    }

    #[test]
    fn test_full_series_by_id_into_temp_dir() {
        let transport = FakeTransport::default()
            .with("http://thetvdb.com/api/KEY/mirrors.xml", MIRRORS)
            .with("http://thetvdb.com/api/KEY/series/83462/all/en.zip", series_archive());
        let client = client(transport);

        let mut events = Vec::new();
        let details = client
            .full_series_with_progress(83462, None, None, |event| events.push(event))
            .unwrap();

        let show = details.show().unwrap();
        assert_eq!(show.base.id, 83462);
        assert_eq!(show.episodes.len(), 1);
        assert_eq!(show.cast.len(), 1);
        assert_eq!(details.artworks().unwrap().len(), 1);

        assert!(matches!(events.first(), Some(ProgressEvent::ResolvingMirror)));
        assert!(matches!(events.last(), Some(ProgressEvent::Loaded { series_id: 83462, .. })));
        // The temporary extraction directory is gone again
        assert!(!details.directory().exists());
    }

    #[test]
    fn test_full_series_by_id_into_download_dir() {
        let download_dir = create_temp_dir("tvdb_download_test").unwrap();
        let transport = FakeTransport::default()
            .with("http://mirror.example/api/KEY/series/83462/all/en.zip", series_archive());
        let client = TvDbClient::with_transport(
            ClientConfig {
                download_dir: Some(download_dir.to_path_buf()),
                ..config()
            },
            transport,
        )
        .unwrap();
        let mirror = Mirror::new(1, "http://mirror.example");

        let details = client.full_series_by_id(83462, Some("en"), Some(&mirror)).unwrap();

        assert_eq!(details.directory(), download_dir.join(EXTRACTION_DIR));
        assert!(download_dir.join(ARCHIVE_FILE).is_file());
        assert!(download_dir.join(EXTRACTION_DIR).join("en.xml").is_file());
        assert_eq!(details.show().unwrap().base.name.as_deref(), Some("Castle (2009)"));
    }

    #[test]
    fn test_full_series_by_id_rejects_non_archive() {
        let transport = FakeTransport::default()
            .with("http://mirror.example/api/KEY/series/1/all/en.zip", "<Error>Not found</Error>");
        let client = client(transport);
        let mirror = Mirror::new(1, "http://mirror.example");

        assert!(matches!(
            client.full_series_by_id(1, None, Some(&mirror)),
            Err(RetrievalError::NotAnArchive { .. })
        ));
    }

    #[test]
    fn test_full_series_by_id_rejects_zero_id() {
        let client = client(FakeTransport::default());
        assert!(matches!(
            client.full_series_by_id(0, None, None),
            Err(RetrievalError::InvalidArgument { parameter: "id", .. })
        ));
    }
}
