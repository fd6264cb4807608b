//! Batch vector ingestion pipeline
//!
//! Consumes arriving records, partitions them into batches, and drives
//! Router -> Collection Manager -> Bridge Ledger under bounded concurrency.
//! One record's failure is isolated and logged, never aborting its batch or
//! job; a provider outage degrades down the fallback chain instead of
//! failing the job.
//!
//! Write order inside a batch is strict: the vector upsert happens-before
//! the ledger commit. If the upsert lands but the commit fails, the point
//! is an orphan for the reconciliation pass to repair; it is never
//! silently lost and never surfaced to callers as anything but a failed
//! record.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::StreamExt;
use serde_json::json;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use vb_domain::constants::{
    DEFAULT_INGEST_CONCURRENCY, INGEST_BATCH_MAX, INGEST_BATCH_MIN, PAYLOAD_KEY_PREVIEW,
    PAYLOAD_KEY_RECORD, PAYLOAD_KEY_VECTOR_TYPE, PAYLOAD_PREVIEW_MAX_CHARS,
};
use vb_domain::error::{Error, Result};
use vb_domain::ports::infrastructure::{BridgeLedger, MetricsSink};
use vb_domain::ports::providers::VectorPoint;
use vb_domain::value_objects::{
    BridgeRecord, CollectionSpec, Embedding, IngestionJob, ProgressSnapshot, RoutePreference,
    SourceRecord, TenantId, VectorType,
};

use crate::cache::{EmbeddingLookup, TieredCache};
use crate::routing::ProviderRouter;

use super::collection_manager::CollectionManager;

/// Pipeline tuning knobs
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Smallest batch the partitioner produces (except the tail)
    pub batch_min: usize,
    /// Largest batch the partitioner produces
    pub batch_max: usize,
    /// Concurrent batches in flight, across all jobs
    pub concurrency: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            batch_min: INGEST_BATCH_MIN,
            batch_max: INGEST_BATCH_MAX,
            concurrency: DEFAULT_INGEST_CONCURRENCY,
        }
    }
}

/// Result of storing one record's vector
#[derive(Debug, Clone)]
pub struct StoredVector {
    /// Vector-index point id
    pub point_id: String,
    /// Adapter that generated the embedding ("cache" on a cache hit)
    pub provider: String,
    /// Model that generated the embedding
    pub model: String,
    /// Amortized cost of the record's share of the provider call
    pub cost: f64,
    /// Provider-call latency attributed to the record
    pub latency_ms: u64,
}

/// Monotonic progress counters of one running job
#[derive(Debug)]
struct JobProgress {
    total: u64,
    processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    started: Instant,
}

impl JobProgress {
    fn new(total: u64) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    fn record(&self, success: bool) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> ProgressSnapshot {
        let processed = self.processed.load(Ordering::Relaxed);
        let elapsed = self.started.elapsed();
        let elapsed_secs = elapsed.as_secs();
        // Throughput-derived ETA once there is any throughput to derive from
        let eta_secs = if processed > 0 && processed < self.total {
            let rate = processed as f64 / elapsed.as_secs_f64().max(0.001);
            Some(((self.total - processed) as f64 / rate).ceil() as u64)
        } else {
            None
        };
        ProgressSnapshot {
            total: self.total,
            processed,
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            elapsed_secs,
            eta_secs,
        }
    }
}

/// Handle onto a background ingestion job
///
/// Progress is observable by polling; it is never durably persisted.
/// Cancelling lets in-flight batches run to completion and schedules no
/// new batches afterward.
pub struct JobHandle {
    progress: Arc<JobProgress>,
    cancel: CancellationToken,
    done: tokio::sync::watch::Receiver<bool>,
}

impl JobHandle {
    /// Current counters and ETA
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Request cancellation; in-flight batches drain
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait until the job finishes or drains after cancellation
    pub async fn wait(&mut self) -> ProgressSnapshot {
        while !*self.done.borrow() {
            if self.done.changed().await.is_err() {
                break;
            }
        }
        self.progress.snapshot()
    }
}

type RecordOutcome = (String, Result<StoredVector>);

/// The batch ingestion pipeline
pub struct IngestionPipeline {
    router: Arc<ProviderRouter>,
    cache: Arc<TieredCache>,
    collections: Arc<CollectionManager>,
    ledger: Arc<dyn BridgeLedger>,
    metrics: Arc<dyn MetricsSink>,
    config: IngestionConfig,
    // Process-wide pool: jobs share the batch budget, so a large backfill
    // cannot monopolize the engine
    batch_permits: Arc<Semaphore>,
}

impl IngestionPipeline {
    /// Wire the pipeline to its collaborators
    pub fn new(
        router: Arc<ProviderRouter>,
        cache: Arc<TieredCache>,
        collections: Arc<CollectionManager>,
        ledger: Arc<dyn BridgeLedger>,
        metrics: Arc<dyn MetricsSink>,
        config: IngestionConfig,
    ) -> Self {
        let permits = config.concurrency.max(1);
        Self {
            router,
            cache,
            collections,
            ledger,
            metrics,
            config,
            batch_permits: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Batch size for a job, scaled to its record count
    ///
    /// Spreads small jobs across the worker pool and clamps large jobs
    /// into the configured window.
    pub fn batch_size_for(&self, total: usize) -> usize {
        if total == 0 {
            return self.config.batch_min;
        }
        total
            .div_ceil(self.config.concurrency.max(1))
            .clamp(self.config.batch_min, self.config.batch_max)
    }

    /// Run a job to completion and return its final counters
    pub async fn ingest(&self, job: &IngestionJob) -> Result<ProgressSnapshot> {
        let progress = Arc::new(JobProgress::new(job.records.len() as u64));
        let cancel = CancellationToken::new();
        self.run(job, &progress, &cancel).await?;
        Ok(progress.snapshot())
    }

    /// Start a job in the background and return a polling handle
    pub fn start(self: &Arc<Self>, job: IngestionJob) -> JobHandle {
        let progress = Arc::new(JobProgress::new(job.records.len() as u64));
        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = tokio::sync::watch::channel(false);

        let pipeline = Arc::clone(self);
        let task_progress = Arc::clone(&progress);
        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = pipeline.run(&job, &task_progress, &task_cancel).await {
                error!(job_id = %job.job_id, error = %e, "ingestion job aborted");
            }
            let _ = done_tx.send(true);
        });

        JobHandle {
            progress,
            cancel,
            done: done_rx,
        }
    }

    /// Store one record synchronously (the `vectors/store` path)
    pub async fn store_record(
        &self,
        tenant_id: TenantId,
        table: &str,
        record: SourceRecord,
        vector_type: VectorType,
        preference: Option<RoutePreference>,
    ) -> Result<StoredVector> {
        let record_id = record.id.clone();
        let outcomes = self
            .process_batch(tenant_id, table, vector_type, preference, &[record])
            .await?;
        let (_, outcome) = outcomes
            .into_iter()
            .find(|(id, _)| *id == record_id)
            .ok_or_else(|| Error::internal("record outcome missing from batch"))?;
        outcome
    }

    async fn run(
        &self,
        job: &IngestionJob,
        progress: &Arc<JobProgress>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let batch_size = self.batch_size_for(job.records.len());
        let batches: Vec<&[SourceRecord]> = job.records.chunks(batch_size).collect();
        info!(
            job_id = %job.job_id,
            tenant_id = job.tenant_id,
            table = %job.source_table,
            records = job.records.len(),
            batches = batches.len(),
            batch_size,
            "ingestion job started"
        );

        let batch_futures: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(index, batch)| self.run_batch(job, cancel, index, batch))
            .collect();
        let outcomes = futures::stream::iter(batch_futures)
            .buffer_unordered(self.config.concurrency.max(1))
            .collect::<Vec<Result<Vec<RecordOutcome>>>>()
            .await;

        for batch_outcome in outcomes {
            let records = batch_outcome?;
            for (record_id, outcome) in records {
                match outcome {
                    Ok(_) => progress.record(true),
                    Err(e) => {
                        warn!(
                            job_id = %job.job_id,
                            record_id = %record_id,
                            error = %e,
                            "record failed"
                        );
                        self.metrics.record_error(e.kind());
                        progress.record(false);
                    }
                }
            }
        }

        let snapshot = progress.snapshot();
        info!(
            job_id = %job.job_id,
            processed = snapshot.processed,
            succeeded = snapshot.succeeded,
            failed = snapshot.failed,
            "ingestion job finished"
        );
        Ok(())
    }

    /// Acquire a worker permit and process one batch, honoring cancellation
    async fn run_batch(
        &self,
        job: &IngestionJob,
        cancel: &CancellationToken,
        index: usize,
        batch: &[SourceRecord],
    ) -> Result<Vec<RecordOutcome>> {
        let permits = Arc::clone(&self.batch_permits);
        // A batch that has not acquired a permit yet is not
        // in flight; cancellation stops it here
        if cancel.is_cancelled() {
            debug!(job_id = %job.job_id, batch = index, "batch skipped, job cancelled");
            return Ok(Vec::new());
        }
        let _permit = permits
            .acquire_owned()
            .await
            .map_err(|_| Error::internal("ingestion worker pool closed"))?;
        if cancel.is_cancelled() {
            return Ok(Vec::new());
        }
        self.process_batch(
            job.tenant_id,
            &job.source_table,
            job.vector_type,
            Some(job.preference),
            batch,
        )
        .await
    }

    /// Process one batch end to end
    ///
    /// Returns per-record outcomes; the outer `Err` is reserved for fatal
    /// errors (collection mismatch, configuration) that must abort the job.
    async fn process_batch(
        &self,
        tenant_id: TenantId,
        table: &str,
        vector_type: VectorType,
        preference: Option<RoutePreference>,
        records: &[SourceRecord],
    ) -> Result<Vec<RecordOutcome>> {
        let mut outcomes: Vec<RecordOutcome> = Vec::with_capacity(records.len());
        // (record index, extracted text, embedding once resolved)
        let mut pending: Vec<(usize, String, Option<(Embedding, StoredVector)>)> = Vec::new();

        // Text extraction and cache lookup precede any provider call
        for (index, record) in records.iter().enumerate() {
            let text = vector_type.extract_text(record);
            if text.trim().is_empty() {
                outcomes.push((
                    record.id.clone(),
                    Err(Error::invalid_input(format!(
                        "record '{}' has no {vector_type} text to embed",
                        record.id
                    ))),
                ));
                continue;
            }

            // A cache failure degrades to a miss; it never fails the record
            let lookup = self
                .cache
                .get_embedding(tenant_id, &text)
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "embedding cache lookup failed, treating as miss");
                    EmbeddingLookup::Miss
                });
            match lookup {
                EmbeddingLookup::Hit(embedding) => {
                    let stored = StoredVector {
                        point_id: String::new(),
                        provider: "cache".to_string(),
                        model: embedding.model.clone(),
                        cost: 0.0,
                        latency_ms: 0,
                    };
                    pending.push((index, text, Some((embedding, stored))));
                }
                EmbeddingLookup::NegativeHit => {
                    outcomes.push((
                        record.id.clone(),
                        Err(Error::provider_rejected(
                            "cache",
                            422,
                            "content tombstoned as rejected",
                        )),
                    ));
                }
                EmbeddingLookup::Miss => pending.push((index, text, None)),
            }
        }

        // One router call per batch of misses amortizes provider overhead
        let miss_indexes: Vec<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, (_, _, e))| e.is_none())
            .map(|(i, _)| i)
            .collect();
        if !miss_indexes.is_empty() {
            let texts: Vec<String> = miss_indexes
                .iter()
                .map(|&i| pending[i].1.clone())
                .collect();
            match self.embed_with_retry(tenant_id, &texts, preference).await {
                Ok(embedded) => {
                    for (slot, embedding_result) in miss_indexes.iter().zip(embedded) {
                        match embedding_result {
                            Ok((embedding, stored)) => {
                                let text = pending[*slot].1.clone();
                                if let Err(e) =
                                    self.cache.put_embedding(tenant_id, &text, &embedding).await
                                {
                                    warn!(error = %e, "embedding cache write failed");
                                }
                                pending[*slot].2 = Some((embedding, stored));
                            }
                            Err(e) => {
                                let record_index = pending[*slot].0;
                                outcomes.push((records[record_index].id.clone(), Err(e)));
                            }
                        }
                    }
                }
                Err(e) => {
                    if matches!(&e, Error::ProviderRejected { status, .. } if *status != 429) {
                        for &i in &miss_indexes {
                            if let Err(cache_err) =
                                self.cache.put_rejected(tenant_id, &pending[i].1).await
                            {
                                warn!(error = %cache_err, "negative cache write failed");
                            }
                        }
                    }
                    for &i in &miss_indexes {
                        let record_index = pending[i].0;
                        outcomes.push((records[record_index].id.clone(), Err(clone_provider_error(&e))));
                    }
                }
            }
        }

        let embedded: Vec<(usize, String, Embedding, StoredVector)> = pending
            .into_iter()
            .filter_map(|(index, text, entry)| {
                entry.map(|(embedding, stored)| (index, text, embedding, stored))
            })
            .collect();
        if embedded.is_empty() {
            return Ok(outcomes);
        }

        // Collection is sized by the embeddings actually produced; a
        // conflict with an existing collection is fatal
        let dimensions = embedded[0].2.dimensions;
        let spec = CollectionSpec::new(tenant_id, table, dimensions);
        let collection = match self.collections.ensure_collection(&spec).await {
            Ok(name) => name,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                let message = e.to_string();
                for (index, ..) in &embedded {
                    outcomes.push((
                        records[*index].id.clone(),
                        Err(Error::vector_db(message.clone())),
                    ));
                }
                return Ok(outcomes);
            }
        };

        // Vector upsert happens-before ledger commit
        let mut points = Vec::with_capacity(embedded.len());
        for (index, text, embedding, _) in &embedded {
            points.push(VectorPoint {
                id: uuid::Uuid::new_v4().to_string(),
                vector: embedding.vector.clone(),
                payload: HashMap::from([
                    (
                        PAYLOAD_KEY_RECORD.to_string(),
                        json!(records[*index].id.clone()),
                    ),
                    (PAYLOAD_KEY_VECTOR_TYPE.to_string(), json!(vector_type.as_str())),
                    (PAYLOAD_KEY_PREVIEW.to_string(), json!(preview(text))),
                ]),
            });
        }
        let point_ids = match self.collections.upsert(&collection, tenant_id, points).await {
            Ok(ids) => ids,
            Err(e) => {
                let message = e.to_string();
                for (index, ..) in &embedded {
                    outcomes.push((
                        records[*index].id.clone(),
                        Err(Error::vector_db(message.clone())),
                    ));
                }
                return Ok(outcomes);
            }
        };

        for ((index, _, embedding, stored), point_id) in embedded.into_iter().zip(point_ids) {
            let record_id = records[index].id.clone();
            let row = BridgeRecord {
                tenant_id,
                source_table: table.to_string(),
                source_record_id: record_id.clone(),
                collection_name: collection.clone(),
                point_id: point_id.clone(),
                vector_type,
                embedding_model: embedding.model.clone(),
                embedding_provider: stored.provider.clone(),
                created_at: chrono::Utc::now(),
                superseded_at: None,
            };

            match self.ledger.commit(row).await {
                Ok(superseded) => {
                    // The replaced point goes away only after the new row
                    // committed, so the record never has zero live vectors
                    if let Some(old) = superseded {
                        if let Err(e) = self
                            .collections
                            .delete_points(&old.collection_name, &[old.point_id.clone()])
                            .await
                        {
                            warn!(
                                collection = %old.collection_name,
                                point_id = %old.point_id,
                                error = %e,
                                "superseded point not deleted, reconciliation will collect it"
                            );
                        }
                    }
                    outcomes.push((
                        record_id,
                        Ok(StoredVector {
                            point_id,
                            ..stored
                        }),
                    ));
                }
                Err(e) => {
                    let orphan = Error::ledger_orphan(&collection, &point_id);
                    warn!(
                        record_id = %record_id,
                        error = %e,
                        orphan = %orphan,
                        "ledger commit failed after upsert"
                    );
                    self.metrics.record_error(orphan.kind());
                    outcomes.push((record_id, Err(e)));
                }
            }
        }

        Ok(outcomes)
    }

    /// Embed a miss set, retrying only the items the first call left out
    async fn embed_with_retry(
        &self,
        tenant_id: TenantId,
        texts: &[String],
        preference: Option<RoutePreference>,
    ) -> Result<Vec<Result<(Embedding, StoredVector)>>> {
        let batch = self.router.embed_batch(tenant_id, texts, preference).await?;
        let share = batch.cost / texts.len() as f64;
        let mut results: Vec<Option<(Embedding, StoredVector)>> = batch
            .embeddings
            .iter()
            .take(texts.len())
            .map(|e| {
                Some((
                    e.clone(),
                    StoredVector {
                        point_id: String::new(),
                        provider: batch.provider.clone(),
                        model: batch.model.clone(),
                        cost: share,
                        latency_ms: batch.latency_ms,
                    },
                ))
            })
            .collect();
        results.resize_with(texts.len(), || None);

        // Partial responses happen; retry just the tail once
        let missing: Vec<usize> = (0..texts.len()).filter(|&i| results[i].is_none()).collect();
        if !missing.is_empty() {
            warn!(
                expected = texts.len(),
                received = texts.len() - missing.len(),
                "provider returned a partial batch, retrying failed items"
            );
            let retry_texts: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            if let Ok(retry) = self
                .router
                .embed_batch(tenant_id, &retry_texts, preference)
                .await
            {
                let retry_share = retry.cost / retry_texts.len() as f64;
                for (&slot, embedding) in missing.iter().zip(retry.embeddings) {
                    results[slot] = Some((
                        embedding,
                        StoredVector {
                            point_id: String::new(),
                            provider: retry.provider.clone(),
                            model: retry.model.clone(),
                            cost: retry_share,
                            latency_ms: retry.latency_ms,
                        },
                    ));
                }
            }
        }

        Ok(results
            .into_iter()
            .map(|r| r.ok_or_else(|| Error::internal("provider returned no embedding for item")))
            .collect())
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PAYLOAD_PREVIEW_MAX_CHARS {
        text.to_string()
    } else {
        text.chars().take(PAYLOAD_PREVIEW_MAX_CHARS).collect()
    }
}

fn clone_provider_error(e: &Error) -> Error {
    match e {
        Error::ProviderExhausted { capability, attempted } => Error::ProviderExhausted {
            capability: capability.clone(),
            attempted: attempted.clone(),
        },
        Error::ProviderRejected {
            provider,
            status,
            message,
        } => Error::provider_rejected(provider.clone(), *status, message.clone()),
        Error::ProviderTimeout {
            provider,
            timeout_ms,
        } => Error::provider_timeout(provider.clone(), *timeout_ms),
        other => Error::internal(format!("batch embedding failed: {other}")),
    }
}

/// When a buffered group of records should be flushed into a job
///
/// Pure function of observable signals, evaluated per orchestration tick;
/// there is no persisted schedule state.
pub fn should_flush(policy: &FlushPolicy, signals: &FlushSignals) -> bool {
    signals.pending >= policy.max_pending
        || (signals.pending > 0 && signals.elapsed_since_first >= policy.max_wait)
}

/// Flush thresholds
#[derive(Debug, Clone)]
pub struct FlushPolicy {
    /// Flush as soon as this many records are buffered
    pub max_pending: usize,
    /// Flush anything older than this, regardless of count
    pub max_wait: Duration,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self {
            max_pending: INGEST_BATCH_MIN,
            max_wait: Duration::from_secs(30),
        }
    }
}

/// Observable flush signals for one buffered group
#[derive(Debug, Clone, Copy)]
pub struct FlushSignals {
    /// Buffered record count
    pub pending: usize,
    /// Time since the oldest buffered record arrived
    pub elapsed_since_first: Duration,
}

struct PendingGroup {
    records: Vec<SourceRecord>,
    first_at: Instant,
}

/// Buffer between the extraction framework and the pipeline
///
/// `on_record_persisted` never blocks extraction on provider I/O: records
/// accumulate per (tenant, table) and flush into background jobs when the
/// policy says so.
pub struct RecordBuffer {
    pipeline: Arc<IngestionPipeline>,
    policy: FlushPolicy,
    vector_type: VectorType,
    preference: RoutePreference,
    pending: Mutex<HashMap<(TenantId, String), PendingGroup>>,
}

impl RecordBuffer {
    /// Create a buffer flushing into the pipeline
    pub fn new(
        pipeline: Arc<IngestionPipeline>,
        policy: FlushPolicy,
        vector_type: VectorType,
        preference: RoutePreference,
    ) -> Self {
        Self {
            pipeline,
            policy,
            vector_type,
            preference,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Trigger from the extraction framework: a record is durably stored
    pub async fn on_record_persisted(
        &self,
        tenant_id: TenantId,
        table: &str,
        record: SourceRecord,
    ) {
        let mut pending = self.pending.lock().await;
        let group = pending
            .entry((tenant_id, table.to_string()))
            .or_insert_with(|| PendingGroup {
                records: Vec::new(),
                first_at: Instant::now(),
            });
        group.records.push(record);

        let signals = FlushSignals {
            pending: group.records.len(),
            elapsed_since_first: group.first_at.elapsed(),
        };
        if should_flush(&self.policy, &signals) {
            let group = pending
                .remove(&(tenant_id, table.to_string()))
                .expect("group inserted above");
            drop(pending);
            self.flush_group(tenant_id, table, group.records);
        }
    }

    /// Orchestration tick: flush any group the policy says is due
    pub async fn tick(&self) {
        let mut due = Vec::new();
        {
            let mut pending = self.pending.lock().await;
            let keys: Vec<(TenantId, String)> = pending
                .iter()
                .filter(|(_, group)| {
                    should_flush(
                        &self.policy,
                        &FlushSignals {
                            pending: group.records.len(),
                            elapsed_since_first: group.first_at.elapsed(),
                        },
                    )
                })
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys {
                if let Some(group) = pending.remove(&key) {
                    due.push((key, group));
                }
            }
        }
        for ((tenant_id, table), group) in due {
            self.flush_group(tenant_id, &table, group.records);
        }
    }

    /// Buffered record count across all groups
    pub async fn pending_records(&self) -> usize {
        self.pending
            .lock()
            .await
            .values()
            .map(|g| g.records.len())
            .sum()
    }

    fn flush_group(&self, tenant_id: TenantId, table: &str, records: Vec<SourceRecord>) {
        info!(
            tenant_id,
            table,
            records = records.len(),
            "flushing buffered records into ingestion job"
        );
        let job = IngestionJob::new(tenant_id, table, records, self.vector_type, self.preference);
        let _handle = self.pipeline.start(job);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_flush_on_count_or_age() {
        let policy = FlushPolicy {
            max_pending: 100,
            max_wait: Duration::from_secs(30),
        };
        assert!(should_flush(
            &policy,
            &FlushSignals {
                pending: 100,
                elapsed_since_first: Duration::ZERO
            }
        ));
        assert!(should_flush(
            &policy,
            &FlushSignals {
                pending: 1,
                elapsed_since_first: Duration::from_secs(31)
            }
        ));
        assert!(!should_flush(
            &policy,
            &FlushSignals {
                pending: 99,
                elapsed_since_first: Duration::from_secs(29)
            }
        ));
        // An empty group never flushes, however old its slot is
        assert!(!should_flush(
            &policy,
            &FlushSignals {
                pending: 0,
                elapsed_since_first: Duration::from_secs(3600)
            }
        ));
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "é".repeat(PAYLOAD_PREVIEW_MAX_CHARS + 40);
        assert_eq!(preview(&long).chars().count(), PAYLOAD_PREVIEW_MAX_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
