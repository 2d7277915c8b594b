//! Assembly quality metrics

use serde::{Deserialize, Serialize};

/// Contiguity metrics of one candidate assembly.
///
/// N50: the contig length at which half the assembly is in contigs at least
/// that long (higher is better). L50: the number of contigs needed to reach
/// half the assembly length (lower is better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyMetrics {
    pub n50: u64,
    pub l50: u64,
}
