// ## `core.rs`: stable public API

use serde_json::Value;
use tracing::{debug, error, info};

use crate::classifier::{classify, is_binary_content, Classification, EncryptionScheme};
use crate::compression::{ArchiveDecompressor, Decompressor};
use crate::credentials::{collect_credentials, SecretResolver};
use crate::crypto::is_vault;
use crate::engine::{DecryptInput, DecryptionEngine};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::types::{Body, DownloadFailure, DownloadResult, RequestOptions};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::PipelineError;

/// Fetch collaborator. Failures are handed back to the caller unchanged.
pub trait Fetcher {
    fn download(&self, request: &RequestOptions) -> Result<DownloadResult, DownloadFailure>;
}

impl<F> Fetcher for F
where
    F: Fn(&RequestOptions) -> Result<DownloadResult, DownloadFailure>,
{
    fn download(&self, request: &RequestOptions) -> Result<DownloadResult, DownloadFailure> {
        self(request)
    }
}

/// Classify → collect → decrypt → decompress, for one downloaded object.
///
/// The orchestrator either calls [`DecryptionPipeline::process`] after its own
/// fetch, or lets [`DecryptionPipeline::process_download`] drive a [`Fetcher`].
/// No state is kept between calls.
pub struct DecryptionPipeline<R> {
    resolver: R,
    engine: DecryptionEngine,
    decompressor: Box<dyn Decompressor>,
    config: PipelineConfig,
}

impl<R: SecretResolver> DecryptionPipeline<R> {
    pub fn new(resolver: R, config: PipelineConfig) -> Self {
        Self {
            resolver,
            engine: DecryptionEngine::default(),
            decompressor: Box::new(ArchiveDecompressor::new(config.max_decompressed_len)),
            config,
        }
    }

    pub fn with_engine(mut self, engine: DecryptionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_decompressor(mut self, decompressor: Box<dyn Decompressor>) -> Self {
        self.decompressor = decompressor;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 🔓 Fetch `request` and run the pipeline on the response.
    pub fn process_download<F>(
        &self,
        fetcher: &F,
        request: RequestOptions,
        resource: &Value,
    ) -> Result<DownloadResult, DownloadFailure>
    where
        F: Fetcher + ?Sized,
    {
        self.process_download_with_telemetry(fetcher, request, resource)
            .map(|(result, _)| result)
    }

    pub fn process_download_with_telemetry<F>(
        &self,
        fetcher: &F,
        mut request: RequestOptions,
        resource: &Value,
    ) -> Result<(DownloadResult, TelemetrySnapshot), DownloadFailure>
    where
        F: Fetcher + ?Sized,
    {
        request.prepare_for_decryption();
        let result = fetcher.download(&request)?;
        self.process_with_telemetry(&request, resource, result)
    }

    /// Run the pipeline on an already fetched response.
    pub fn process(
        &self,
        request: &RequestOptions,
        resource: &Value,
        result: DownloadResult,
    ) -> Result<DownloadResult, DownloadFailure> {
        self.process_with_telemetry(request, resource, result)
            .map(|(result, _)| result)
    }

    pub fn process_with_telemetry(
        &self,
        request: &RequestOptions,
        resource: &Value,
        mut result: DownloadResult,
    ) -> Result<(DownloadResult, TelemetrySnapshot), DownloadFailure> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        if !result.is_success() {
            debug!(status = result.status_code, "non-200 response, passing through");
            timer.finish();
            return Ok((result, TelemetrySnapshot::from(&counters, &timer)));
        }

        let source = request.source().to_owned();
        let binary = is_binary_content(&result.headers, &self.config.binary_content_types);
        // Non-binary bodies become text only when they are valid UTF-8.
        let body = if binary { result.body } else { Body::from_output(result.body.into_bytes(), true) };
        counters.bytes_in = body.len() as u64;

        info!(source = %source, body = body.kind(), length = body.len(), "downloaded");

        let classification = timer.time(Stage::Classify, || classify(&source));
        debug!(
            source = %source,
            scheme = %classification.scheme,
            compressed = classification.compressed,
            binary,
            "classified"
        );

        match self.run(&source, binary, classification, resource, body, &mut counters, &mut timer) {
            Ok(body) => {
                counters.bytes_out = body.len() as u64;
                result.body = body;
                timer.finish();
                let snapshot = TelemetrySnapshot::from(&counters, &timer);
                debug!(source = %source, telemetry = ?snapshot, "pipeline finished");
                Ok((result, snapshot))
            }
            Err(e) => {
                error!(source = %source, error = %e, "decryption failed");
                Err(e.to_failure())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        source: &str,
        binary: bool,
        classification: Classification,
        resource: &Value,
        body: Body,
        counters: &mut TelemetryCounters,
        timer: &mut TelemetryTimer,
    ) -> Result<Body, PipelineError> {
        let text_response = !binary;

        let body = match classification.scheme {
            EncryptionScheme::None => body,
            scheme => {
                let collected = timer.time(Stage::Collect, || {
                    collect_credentials(resource, &self.resolver, self.config.resolve_concurrently)
                });
                counters.add_collection(&collected);
                let credentials = collected.into_credentials();
                debug!(source, credentials = credentials.len(), "credentials found");

                if scheme == EncryptionScheme::SymmetricVault && !is_vault(body.as_bytes()) {
                    debug!(source, "payload does not start with a vault header");
                }

                let input = DecryptInput {
                    source,
                    payload: body.as_bytes(),
                    binary,
                };
                let output = timer.time(Stage::Decrypt, || self.engine.decrypt(&input, scheme, &credentials))?;
                counters.add_decrypt(output.attempts, output.plaintext.len());
                debug!(source, attempts = output.attempts, "decryption succeeded");

                Body::from_output(output.plaintext, text_response)
            }
        };

        if !classification.compressed {
            return Ok(body);
        }

        let unpacked = timer
            .time(Stage::Decompress, || self.decompressor.decompress(body.as_bytes()))
            .map_err(|error| PipelineError::Decompression {
                source_id: source.to_owned(),
                error,
            })?;
        Ok(Body::from_output(unpacked, text_response))
    }
}
