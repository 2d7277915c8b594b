//! Quality report parsing
//!
//! Extracts the few values the pipeline acts on from the tabular reports the
//! evaluation tools produce: N50/L50 from an assembly-evaluation report, and
//! the Basic Statistics block from a FastQC data report.

use asmflow_core::domain::metrics::AssemblyMetrics;

use crate::error::PipelineError;

/// Parses N50 and L50 out of an assembly-evaluation tabular report.
///
/// The report is tab-separated label/value rows, one metric per line.
/// Quantities are reported for contigs above the configured minimum only,
/// which is what the selector compares.
pub fn parse_quast_report(text: &str) -> Result<AssemblyMetrics, PipelineError> {
    let mut n50 = None;
    let mut l50 = None;

    for line in text.lines() {
        let mut fields = line.split('\t');
        let (Some(label), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };

        match label.trim() {
            "N50" => n50 = Some(parse_metric("N50", value)?),
            "L50" => l50 = Some(parse_metric("L50", value)?),
            _ => {}
        }
    }

    match (n50, l50) {
        (Some(n50), Some(l50)) => Ok(AssemblyMetrics { n50, l50 }),
        (None, _) => Err(PipelineError::MalformedReport(
            "missing N50 row".to_string(),
        )),
        (_, None) => Err(PipelineError::MalformedReport(
            "missing L50 row".to_string(),
        )),
    }
}

fn parse_metric(label: &str, value: &str) -> Result<u64, PipelineError> {
    value.trim().parse::<u64>().map_err(|_| {
        PipelineError::MalformedReport(format!("{label} value '{}' is not a number", value.trim()))
    })
}

/// Basic Statistics block of a FastQC data report.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FastqcSummary {
    pub filename: Option<String>,
    pub file_type: Option<String>,
    pub encoding: Option<String>,
    pub total_sequences: Option<u64>,
    pub sequence_length: Option<String>,
    pub percent_gc: Option<u64>,
}

/// Extracts the Basic Statistics block from a FastQC `fastqc_data.txt`.
///
/// The block is delimited by `>>Basic Statistics` and `>>END_MODULE`;
/// rows are tab-separated measure/value pairs. Fields the report does not
/// carry stay `None`.
pub fn parse_fastqc_data(text: &str) -> Result<FastqcSummary, PipelineError> {
    let mut summary = FastqcSummary::default();
    let mut in_block = false;
    let mut seen_block = false;

    for line in text.lines() {
        if line.starts_with(">>Basic Statistics") {
            in_block = true;
            seen_block = true;
            continue;
        }
        if line.starts_with(">>END_MODULE") {
            if in_block {
                break;
            }
            continue;
        }
        if !in_block || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split('\t');
        let (Some(measure), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let value = value.trim();

        match measure.trim() {
            "Filename" => summary.filename = Some(value.to_string()),
            "File type" => summary.file_type = Some(value.to_string()),
            "Encoding" => summary.encoding = Some(value.to_string()),
            "Total Sequences" => summary.total_sequences = value.parse().ok(),
            "Sequence length" => summary.sequence_length = Some(value.to_string()),
            "%GC" => summary.percent_gc = value.parse().ok(),
            _ => {}
        }
    }

    if !seen_block {
        return Err(PipelineError::MalformedReport(
            "no Basic Statistics block found".to_string(),
        ));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAST_REPORT: &str = "\
Assembly\tcontigs
# contigs (>= 0 bp)\t142
Total length\t4641652
N50\t254321
L50\t6
GC (%)\t50.78";

    #[test]
    fn test_parse_quast_report() {
        let metrics = parse_quast_report(QUAST_REPORT).unwrap();
        assert_eq!(metrics.n50, 254321);
        assert_eq!(metrics.l50, 6);
    }

    #[test]
    fn test_parse_quast_report_missing_n50() {
        let err = parse_quast_report("Assembly\tcontigs\nL50\t6").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedReport(_)));
    }

    #[test]
    fn test_parse_quast_report_unparseable_value() {
        let err = parse_quast_report("N50\t-\nL50\t6").unwrap_err();
        match err {
            PipelineError::MalformedReport(msg) => assert!(msg.contains("N50")),
            other => panic!("expected malformed-report error, got {other:?}"),
        }
    }

    const FASTQC_DATA: &str = "\
##FastQC\t0.11.8
>>Basic Statistics\tpass
#Measure\tValue
Filename\treads_R1.fastq.gz
File type\tConventional base calls
Encoding\tSanger / Illumina 1.9
Total Sequences\t250000
Sequences flagged as poor quality\t0
Sequence length\t35-151
%GC\t51
>>END_MODULE
>>Per base sequence quality\tpass
>>END_MODULE";

    #[test]
    fn test_parse_fastqc_data() {
        let summary = parse_fastqc_data(FASTQC_DATA).unwrap();
        assert_eq!(summary.filename.as_deref(), Some("reads_R1.fastq.gz"));
        assert_eq!(summary.encoding.as_deref(), Some("Sanger / Illumina 1.9"));
        assert_eq!(summary.total_sequences, Some(250000));
        assert_eq!(summary.sequence_length.as_deref(), Some("35-151"));
        assert_eq!(summary.percent_gc, Some(51));
    }

    #[test]
    fn test_parse_fastqc_data_without_block() {
        let err = parse_fastqc_data(">>Per base sequence quality\tpass\n>>END_MODULE").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedReport(_)));
    }
}
