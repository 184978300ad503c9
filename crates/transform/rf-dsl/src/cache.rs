//! Content-addressed cache of compiled programs.

use crate::compiler::RuleCompiler;
use crate::rule::CompiledProgram;
use parking_lot::RwLock;
use rf_error::ScriptError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Get-or-compile cache keyed by exact script byte content.
///
/// A hit returns the same `Arc<CompiledProgram>` instance every time
/// (identity-stable reuse, not just structural equality). There is no
/// eviction: growth is bounded by the number of distinct scripts observed,
/// and one script typically serves one whole job.
///
/// Concurrent lookups from parallel partition workers are safe. Under a
/// race two workers may both compile the same script, but the first insert
/// wins and everyone converges on one instance; a partially built program
/// is never visible.
pub struct RuleCache {
    compiler: RuleCompiler,
    programs: RwLock<HashMap<String, Arc<CompiledProgram>>>,
}

impl RuleCache {
    pub fn new(compiler: RuleCompiler) -> Self {
        Self {
            compiler,
            programs: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached program for this script, compiling it on first use.
    pub fn get_or_compile(&self, script: &str) -> Result<Arc<CompiledProgram>, ScriptError> {
        if let Some(program) = self.programs.read().get(script) {
            trace!("Program cache hit");
            return Ok(program.clone());
        }

        // Compile outside the write lock; losers of the race discard their copy.
        let compiled = Arc::new(self.compiler.compile(script)?);

        let mut programs = self.programs.write();
        let program = programs
            .entry(script.to_string())
            .or_insert_with(|| {
                debug!(rules = compiled.len(), "Cached compiled program");
                compiled
            })
            .clone();
        Ok(program)
    }

    /// Pre-flight validation; see [`RuleCompiler::validate`].
    pub fn validate(&self, script: &str) -> bool {
        self.compiler.validate(script)
    }

    /// Number of distinct scripts compiled so far.
    pub fn len(&self) -> usize {
        self.programs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(RuleCompiler::default())
    }
}
