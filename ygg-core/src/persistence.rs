//! Flat-file persistence of a run's final state.
//!
//! Each record is written as pretty-printed JSON into a results directory:
//!
//! | file | contents |
//! |---|---|
//! | `emotional_memory_stack.json` | memory list and emotion index |
//! | `attachment_graphs.json` | ego, attachment edges and alias settings |
//! | `learning_stats.json` | learning counters and average error |
//! | `bias.json` | concept → emotion → count |
//! | `emotional_time.json` | concept → timeline |
//! | `contradictionlog.json` | contradiction entries |
//!
//! [`ResultsReader`] loads the records back for offline reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::attachment::AttachmentGraph;
use crate::bias::{BiasMeter, ContradictionLog, EmotionalTimeline};
use crate::error::Result;
use crate::memory::MemoryStore;
use crate::metrics::{LearningStats, LearningStatsExport};
use crate::mind::Mind;

/// File holding the memory store.
pub const MEMORY_FILE: &str = "emotional_memory_stack.json";
/// File holding the attachment graph.
pub const ATTACHMENT_FILE: &str = "attachment_graphs.json";
/// File holding the learning statistics.
pub const STATS_FILE: &str = "learning_stats.json";
/// File holding the bias meter.
pub const BIAS_FILE: &str = "bias.json";
/// File holding the emotional timeline.
pub const TIMELINE_FILE: &str = "emotional_time.json";
/// File holding the contradiction log.
pub const CONTRADICTION_FILE: &str = "contradictionlog.json";

/// Writes run results into a directory.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    dir: PathBuf,
}

impl ResultsWriter {
    /// Prepare `dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns [`crate::YggError::Io`] if the directory cannot be created.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every record of `mind` plus `stats`. Returns the written paths.
    ///
    /// # Errors
    /// Returns an error on the first file that cannot be serialized or written.
    pub fn write_all(&self, mind: &Mind, stats: &LearningStats) -> Result<Vec<PathBuf>> {
        let paths = vec![
            self.write(MEMORY_FILE, &mind.store)?,
            self.write(ATTACHMENT_FILE, &mind.graph)?,
            self.write(STATS_FILE, &LearningStatsExport::from(stats))?,
            self.write(BIAS_FILE, &mind.state.bias_meter)?,
            self.write(TIMELINE_FILE, &mind.state.timeline)?,
            self.write(CONTRADICTION_FILE, &mind.state.contradictions)?,
        ];
        info!(
            dir = %self.dir.display(),
            memories = mind.store.len(),
            attachments = mind.graph.len(),
            contradictions = mind.state.contradictions.len(),
            "results saved"
        );
        Ok(paths)
    }

    /// Serialize one record as pretty JSON into `name`.
    ///
    /// # Errors
    /// Returns [`crate::YggError::Serialization`] or [`crate::YggError::Io`].
    pub fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "wrote record");
        Ok(path)
    }
}

/// Reads records written by [`ResultsWriter`].
#[derive(Debug, Clone)]
pub struct ResultsReader {
    dir: PathBuf,
}

impl ResultsReader {
    /// Read from `dir`.
    #[must_use]
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load the memory store.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn memory_store(&self) -> Result<MemoryStore> {
        self.read(MEMORY_FILE)
    }

    /// Load the attachment graph together with the alias settings it was built with.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn attachment_graph(&self) -> Result<AttachmentGraph> {
        self.read(ATTACHMENT_FILE)
    }

    /// Load the bias meter.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn bias_meter(&self) -> Result<BiasMeter> {
        self.read(BIAS_FILE)
    }

    /// Load the emotional timeline.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn timeline(&self) -> Result<EmotionalTimeline> {
        self.read(TIMELINE_FILE)
    }

    /// Load the contradiction log.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn contradictions(&self) -> Result<ContradictionLog> {
        self.read(CONTRADICTION_FILE)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
