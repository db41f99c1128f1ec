//! Texture acquisition with ordered fallbacks.
//!
//! Each request walks its candidate URLs one at a time. An attempt ends when
//! the host reports success or failure for the attempt's [`FetchTicket`], or
//! when the pipeline clock passes the attempt's deadline. When every candidate
//! is spent the body gets a synthesized texture instead. Either way the request
//! resolves exactly once.
//!
//! Callbacks carrying a ticket that no longer matches the live attempt (a late
//! success after a timeout, a duplicate, anything for a resolved request) are
//! dropped and counted as stale.

use std::collections::{BTreeMap, HashMap};

use crate::api::types::{FetchTicket, RequestId};
use crate::error::TextureError;
use crate::ui::notices::{Notice, NoticeLevel};
use super::image::TextureImage;
use super::synth::TextureSynthesizer;

/// Downloads larger than this report intermediate progress.
const LARGE_DOWNLOAD_BYTES: u64 = 1_000_000;

/// Host side of a fetch. Outcomes come back through [`TexturePipeline::complete`].
pub trait TextureFetcher {
    /// Start loading `url`. The result must be reported with `ticket`.
    fn begin(&mut self, ticket: FetchTicket, url: &str);

    /// The attempt's deadline passed. Implementations may cancel the transfer;
    /// any later report for this ticket is ignored regardless.
    fn abandon(&mut self, _ticket: FetchTicket) {}
}

/// Fetcher that only records what it was asked to do.
/// Used by tests and headless runs; outcomes are fed back by the caller.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    pub started: Vec<(FetchTicket, String)>,
    pub abandoned: Vec<FetchTicket>,
}

impl TextureFetcher for RecordingFetcher {
    fn begin(&mut self, ticket: FetchTicket, url: &str) {
        self.started.push((ticket, url.to_string()));
    }

    fn abandon(&mut self, ticket: FetchTicket) {
        self.abandoned.push(ticket);
    }
}

/// Where a request stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestState {
    /// Waiting on candidate `index` until `deadline` on the pipeline clock.
    Attempting { index: u32, deadline: f64 },
    /// Candidate `attempt` delivered the texture.
    Succeeded { attempt: u32 },
    /// Every candidate failed; a generated texture was used.
    Synthesized,
}

impl RequestState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, RequestState::Attempting { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Loaded,
    Failed(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub url: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone)]
struct TextureRequest {
    body: String,
    candidates: Vec<String>,
    state: RequestState,
    history: Vec<AttemptRecord>,
    /// The list starts with a bundled asset rather than a remote one.
    local_first: bool,
}

/// Final record of a resolved request.
#[derive(Debug, Clone)]
pub struct SettledRequest {
    pub body: String,
    pub state: RequestState,
    pub history: Vec<AttemptRecord>,
}

/// One resolution, delivered exactly once per request.
#[derive(Debug, Clone)]
pub struct ResolvedTexture {
    pub request: RequestId,
    pub body: String,
    pub image: TextureImage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Fetches handed to the host.
    pub attempts: u32,
    pub loaded: u32,
    pub failures: u32,
    pub timeouts: u32,
    pub synthesized: u32,
    /// Callbacks ignored because their ticket was no longer live.
    pub stale: u32,
}

pub struct TexturePipeline {
    clock: f64,
    timeout: f64,
    next_id: u32,
    in_flight: BTreeMap<RequestId, TextureRequest>,
    settled: HashMap<RequestId, SettledRequest>,
    synthesizer: TextureSynthesizer,
    resolved: Vec<ResolvedTexture>,
    notices: Vec<Notice>,
    stats: PipelineStats,
}

impl TexturePipeline {
    /// `timeout` is the per-attempt wait in pipeline clock units (seconds).
    pub fn new(timeout: f32, synthesizer: TextureSynthesizer) -> Self {
        Self {
            clock: 0.0,
            timeout: timeout.max(0.0) as f64,
            next_id: 1,
            in_flight: BTreeMap::new(),
            settled: HashMap::new(),
            synthesizer,
            resolved: Vec::new(),
            notices: Vec::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Begin acquiring a texture for `body` from `candidates`, in order.
    /// An empty list falls back immediately.
    pub fn acquire(
        &mut self,
        body: &str,
        candidates: &[String],
        fetcher: &mut dyn TextureFetcher,
    ) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        self.notices.push(Notice::Status(format!("Loading texture for {}...", body)));
        if candidates.is_empty() {
            log::warn!("No texture sources for {}", body);
        }

        self.in_flight.insert(
            id,
            TextureRequest {
                body: body.to_string(),
                candidates: candidates.to_vec(),
                state: RequestState::Attempting { index: 0, deadline: self.clock },
                history: Vec::new(),
                local_first: candidates.first().is_some_and(|u| u.starts_with("textures/")),
            },
        );
        self.start_attempt(id, 0, fetcher);
        id
    }

    /// Report the outcome of the fetch identified by `ticket`.
    /// Returns false when the ticket is stale and the report was ignored.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<TextureImage, TextureError>,
        fetcher: &mut dyn TextureFetcher,
    ) -> bool {
        let Some(req) = self.live_request_mut(ticket) else {
            self.stats.stale += 1;
            log::debug!("Ignoring stale texture callback {:?}", ticket);
            return false;
        };
        let url = req.candidates[ticket.attempt as usize].clone();

        match result {
            Ok(image) => {
                req.history.push(AttemptRecord { url, outcome: AttemptOutcome::Loaded });
                req.state = RequestState::Succeeded { attempt: ticket.attempt };
                let status = format!(
                    "Loaded {} ({}/{})",
                    req.body,
                    ticket.attempt + 1,
                    req.candidates.len()
                );
                log::info!("{}", status);
                self.stats.loaded += 1;
                self.notices.push(Notice::Status(status));
                self.resolve(ticket.request, image);
            }
            Err(err) => {
                log::warn!("Failed to load texture for {} from {}: {}", req.body, url, err);
                req.history.push(AttemptRecord {
                    url,
                    outcome: AttemptOutcome::Failed(err.to_string()),
                });
                self.stats.failures += 1;
                self.start_attempt(ticket.request, ticket.attempt + 1, fetcher);
            }
        }
        true
    }

    /// Byte-level progress from the host. Only large downloads are reported.
    pub fn report_download(&mut self, ticket: FetchTicket, loaded: u64, total: u64) {
        if total <= LARGE_DOWNLOAD_BYTES {
            return;
        }
        let Some(req) = self.live_request_mut(ticket) else { return };
        let percent = (loaded.min(total) as f64 / total as f64 * 100.0).round() as u32;
        let status = format!("Loading {}: {}%", req.body, percent);
        self.notices.push(Notice::Status(status));
    }

    /// Move the pipeline clock forward and expire overdue attempts.
    pub fn advance(&mut self, dt: f32, fetcher: &mut dyn TextureFetcher) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt as f64;
        }

        let clock = self.clock;
        let expired: Vec<(RequestId, u32)> = self
            .in_flight
            .iter()
            .filter_map(|(id, req)| match req.state {
                RequestState::Attempting { index, deadline } if clock >= deadline => Some((*id, index)),
                _ => None,
            })
            .collect();

        for (id, index) in expired {
            let Some(req) = self.in_flight.get_mut(&id) else { continue };
            let url = req.candidates[index as usize].clone();
            log::warn!(
                "Texture load timeout for {} (attempt {}/{})",
                req.body,
                index + 1,
                req.candidates.len()
            );
            req.history.push(AttemptRecord { url, outcome: AttemptOutcome::TimedOut });
            self.stats.timeouts += 1;
            fetcher.abandon(FetchTicket { request: id, attempt: index });
            self.start_attempt(id, index + 1, fetcher);
        }
    }

    /// Resolutions since the last call, in resolution order.
    pub fn take_resolved(&mut self) -> Vec<ResolvedTexture> {
        std::mem::take(&mut self.resolved)
    }

    /// Status messages since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn state(&self, id: RequestId) -> Option<RequestState> {
        self.in_flight
            .get(&id)
            .map(|r| r.state)
            .or_else(|| self.settled.get(&id).map(|s| s.state))
    }

    pub fn history(&self, id: RequestId) -> Option<&[AttemptRecord]> {
        self.in_flight
            .get(&id)
            .map(|r| r.history.as_slice())
            .or_else(|| self.settled.get(&id).map(|s| s.history.as_slice()))
    }

    pub fn settled(&self, id: RequestId) -> Option<&SettledRequest> {
        self.settled.get(&id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn synthesizer(&self) -> &TextureSynthesizer {
        &self.synthesizer
    }

    fn live_request_mut(&mut self, ticket: FetchTicket) -> Option<&mut TextureRequest> {
        self.in_flight.get_mut(&ticket.request).filter(|req| {
            matches!(req.state, RequestState::Attempting { index, .. } if index == ticket.attempt)
        })
    }

    /// Hand candidate `index` to the fetcher, or fall back when none remain.
    fn start_attempt(&mut self, id: RequestId, index: u32, fetcher: &mut dyn TextureFetcher) {
        let Some(req) = self.in_flight.get_mut(&id) else { return };
        let Some(url) = req.candidates.get(index as usize).cloned() else {
            self.fall_back(id);
            return;
        };

        req.state = RequestState::Attempting { index, deadline: self.clock + self.timeout };
        self.stats.attempts += 1;
        log::debug!(
            "Texture attempt {}/{} for {}: {}",
            index + 1,
            req.candidates.len(),
            req.body,
            url
        );

        if !req.local_first || (index > 0 && url.contains("http")) {
            self.notices.push(Notice::Toast(format!(
                "Loading {} texture from online source...",
                req.body
            )));
            self.notices.push(Notice::Notify(
                NoticeLevel::Info,
                format!("Using online source for {} texture", req.body),
            ));
        }

        fetcher.begin(FetchTicket { request: id, attempt: index }, &url);
    }

    fn fall_back(&mut self, id: RequestId) {
        let Some(req) = self.in_flight.get_mut(&id) else { return };
        req.state = RequestState::Synthesized;
        let body = req.body.clone();

        log::warn!("All texture URLs failed for {}. Using fallback.", body);
        let image = self.synthesizer.synthesize(&body);
        self.stats.synthesized += 1;

        let message = format!("Using generated texture for {}", body);
        self.notices.push(Notice::Toast(message.clone()));
        self.notices.push(Notice::Notify(NoticeLevel::Warning, message));
        self.notices.push(Notice::Status(format!("Created fallback for {}", body)));
        self.resolve(id, image);
    }

    /// Move a request out of flight and queue its single resolution.
    fn resolve(&mut self, id: RequestId, image: TextureImage) {
        let Some(req) = self.in_flight.remove(&id) else { return };
        self.resolved.push(ResolvedTexture {
            request: id,
            body: req.body.clone(),
            image,
        });
        self.settled.insert(
            id,
            SettledRequest {
                body: req.body,
                state: req.state,
                history: req.history,
            },
        );
    }
}
