//! Tool catalog
//!
//! Versioned tool identifiers and parameter key names are the execution
//! service's addressing scheme; every constant here is an external contract
//! value and must match the service's toolshed installation exactly.
//!
//! Each tool gets a typed parameter struct that renders itself into the
//! service's nested `inputs` map, replacing hand-built dictionaries.

use asmflow_core::domain::dataset::DatasetRef;
use asmflow_core::dto::tool::ToolSchema;
use serde_json::{Value, json};

use crate::error::PipelineError;

/// Versioned tool ids as installed on the service.
pub mod ids {
    pub const FASTQC: &str = "toolshed.g2.bx.psu.edu/repos/devteam/fastqc/fastqc/0.72";
    pub const BOWTIE2: &str = "toolshed.g2.bx.psu.edu/repos/devteam/bowtie2/bowtie2/2.4.2+galaxy0";
    pub const TRIMMOMATIC: &str =
        "toolshed.g2.bx.psu.edu/repos/devteam/trimmomatic/trimmomatic/0.39";
    pub const SPADES: &str = "toolshed.g2.bx.psu.edu/repos/nml/spades/spades/3.12.0+galaxy1";
    pub const VELVET: &str = "toolshed.g2.bx.psu.edu/repos/devteam/velvet/velvet/1.2.10";
    pub const QUAST: &str = "toolshed.g2.bx.psu.edu/repos/iuc/quast/quast/5.0.2+galaxy1";
    pub const PROKKA: &str = "toolshed.g2.bx.psu.edu/repos/crs4/prokka/prokka/1.14.6+galaxy1";
}

/// Output names the tools declare, as they appear in a job's result map.
pub mod outputs {
    pub const FASTQC_HTML: &str = "html_file";
    pub const FASTQC_TEXT: &str = "text_file";

    pub const BOWTIE2_UNALIGNED_L: &str = "output_unaligned_reads_l";
    pub const BOWTIE2_UNALIGNED_R: &str = "output_unaligned_reads_r";

    pub const TRIMMOMATIC_R1_PAIRED: &str = "fastq_out_r1_paired";
    pub const TRIMMOMATIC_R2_PAIRED: &str = "fastq_out_r2_paired";

    pub const SPADES_CONTIGS: &str = "out_contigs";
    pub const VELVET_CONTIGS: &str = "contigs";

    pub const QUAST_REPORT_TABULAR: &str = "report_tabular";

    pub const PROKKA_GFF: &str = "out_gff";
    pub const PROKKA_FNA: &str = "out_fna";
    pub const PROKKA_FAA: &str = "out_faa";
}

/// FastQC quality-control parameters.
#[derive(Debug, Clone)]
pub struct FastqcParams {
    pub input: DatasetRef,
}

impl FastqcParams {
    pub fn into_inputs(self) -> Value {
        json!({
            "input_file": self.input,
        })
    }
}

/// Bowtie2 alignment parameters.
///
/// Always runs in paired mode against a reference from the history, with the
/// unaligned-read split enabled: the pipeline consumes the reads that did NOT
/// map to the reference.
#[derive(Debug, Clone)]
pub struct Bowtie2Params {
    pub r1: DatasetRef,
    pub r2: DatasetRef,
    pub reference: DatasetRef,
}

impl Bowtie2Params {
    pub fn into_inputs(self) -> Value {
        json!({
            "library|type": "paired",
            "library|input_1": self.r1,
            "library|input_2": self.r2,
            "library|unaligned_file": true,
            "reference_genome|source": "history",
            "reference_genome|own_file": self.reference,
            "analysis_type|analysis_type_selector": "simple",
        })
    }
}

/// Trimmomatic read-trimming parameters.
///
/// Operation values follow the tool's `OPERATION:arguments` syntax.
#[derive(Debug, Clone)]
pub struct TrimmomaticParams {
    pub r1: DatasetRef,
    pub r2: DatasetRef,
    /// ILLUMINACLIP argument string, e.g. "adapters.fa:2:30:10"
    pub illuminaclip: String,
    /// SLIDINGWINDOW argument string, e.g. "4:20"
    pub sliding_window: String,
    /// Minimum read length kept after trimming
    pub min_len: u32,
}

impl TrimmomaticParams {
    /// Paired trimming with the operation arguments the pipeline has always
    /// used.
    pub fn paired(r1: DatasetRef, r2: DatasetRef) -> Self {
        Self {
            r1,
            r2,
            illuminaclip: "adapters.fa:2:30:10".to_string(),
            sliding_window: "4:20".to_string(),
            min_len: 36,
        }
    }

    pub fn into_inputs(self) -> Value {
        json!({
            "readtype|single_or_paired": "pair_of_files",
            "readtype|fastq_r1_in": self.r1,
            "readtype|fastq_r2_in": self.r2,
            "ILLUMINACLIP": { "value": self.illuminaclip },
            "SLIDINGWINDOW": { "value": self.sliding_window },
            "MINLEN": { "value": self.min_len },
        })
    }
}

/// SPAdes assembly parameters (paired-end, careful mode).
#[derive(Debug, Clone)]
pub struct SpadesParams {
    pub r1: DatasetRef,
    pub r2: DatasetRef,
    pub careful: bool,
}

impl SpadesParams {
    pub fn paired(r1: DatasetRef, r2: DatasetRef) -> Self {
        Self {
            r1,
            r2,
            careful: true,
        }
    }

    pub fn into_inputs(self) -> Value {
        json!({
            "libraries_0|lib_type": "paired_end",
            "libraries_0|files_0|file_type|type": "separate",
            "libraries_0|files_0|file_type|fwd_reads": self.r1,
            "libraries_0|files_0|file_type|rev_reads": self.r2,
            "careful": self.careful,
        })
    }
}

/// Velvet assembly parameters.
#[derive(Debug, Clone)]
pub struct VelvetParams {
    pub r1: DatasetRef,
    pub r2: DatasetRef,
    /// k-mer length; must be odd
    pub hash_length: u32,
}

impl VelvetParams {
    pub fn paired(r1: DatasetRef, r2: DatasetRef) -> Self {
        Self {
            r1,
            r2,
            hash_length: 29,
        }
    }

    pub fn into_inputs(self) -> Value {
        json!({
            "hash_length": self.hash_length.to_string(),
            "inputs_0|input": self.r1,
            "inputs_0|read_type": "shortPaired",
            "inputs_1|input": self.r2,
            "inputs_1|read_type": "shortPaired",
            "generate_amos": "no",
        })
    }
}

/// QUAST assembly-evaluation parameters.
#[derive(Debug, Clone)]
pub struct QuastParams {
    pub assembly: DatasetRef,
    /// Contigs shorter than this are ignored by the evaluation
    pub min_contig: u32,
}

impl QuastParams {
    pub fn for_assembly(assembly: DatasetRef) -> Self {
        Self {
            assembly,
            min_contig: 500,
        }
    }

    pub fn into_inputs(self) -> Value {
        json!({
            "in|custom": "false",
            "in|inputs": [self.assembly],
            "min_contig": self.min_contig,
        })
    }
}

/// Prokka gene-prediction parameters.
#[derive(Debug, Clone)]
pub struct ProkkaParams {
    pub contigs: DatasetRef,
    pub kingdom: String,
}

impl ProkkaParams {
    pub fn bacterial(contigs: DatasetRef) -> Self {
        Self {
            contigs,
            kingdom: "Bacteria".to_string(),
        }
    }

    pub fn into_inputs(self) -> Value {
        json!({
            "input": self.contigs,
            "kingdom": self.kingdom,
        })
    }
}

/// Checks a rendered parameter map against the tool's declared schema.
///
/// Only the section prefix of a `section|name` key is declared at the
/// schema's top level, so keys are compared by prefix. A schema with no
/// declared inputs (the service omitted io details) is treated as
/// unavailable and skipped.
pub fn validate_inputs(
    tool_id: &str,
    inputs: &Value,
    schema: &ToolSchema,
) -> Result<(), PipelineError> {
    if schema.inputs.is_empty() {
        return Ok(());
    }

    let declared: Vec<&str> = schema.input_names().collect();

    if let Some(map) = inputs.as_object() {
        for key in map.keys() {
            let top_level = key.split('|').next().unwrap_or(key);
            if !declared.contains(&top_level) {
                return Err(PipelineError::UnknownParameter {
                    tool_id: tool_id.to_string(),
                    name: key.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hda(id: &str) -> DatasetRef {
        DatasetRef::hda(id)
    }

    #[test]
    fn test_fastqc_inputs_contract() {
        let inputs = FastqcParams { input: hda("d1") }.into_inputs();
        assert_eq!(inputs["input_file"]["src"], "hda");
        assert_eq!(inputs["input_file"]["id"], "d1");
    }

    #[test]
    fn test_bowtie2_inputs_contract() {
        let inputs = Bowtie2Params {
            r1: hda("r1"),
            r2: hda("r2"),
            reference: hda("ref"),
        }
        .into_inputs();

        assert_eq!(inputs["library|type"], "paired");
        assert_eq!(inputs["library|input_1"]["id"], "r1");
        assert_eq!(inputs["library|input_2"]["id"], "r2");
        assert_eq!(inputs["library|unaligned_file"], true);
        assert_eq!(inputs["reference_genome|source"], "history");
        assert_eq!(inputs["reference_genome|own_file"]["id"], "ref");
    }

    #[test]
    fn test_trimmomatic_default_operations() {
        let inputs = TrimmomaticParams::paired(hda("a"), hda("b")).into_inputs();

        assert_eq!(inputs["readtype|single_or_paired"], "pair_of_files");
        assert_eq!(inputs["ILLUMINACLIP"]["value"], "adapters.fa:2:30:10");
        assert_eq!(inputs["SLIDINGWINDOW"]["value"], "4:20");
        assert_eq!(inputs["MINLEN"]["value"], 36);
    }

    #[test]
    fn test_quast_wraps_assembly_in_list() {
        let inputs = QuastParams::for_assembly(hda("contigs-1")).into_inputs();
        assert_eq!(inputs["in|inputs"][0]["id"], "contigs-1");
        assert_eq!(inputs["min_contig"], 500);
    }

    #[test]
    fn test_validate_inputs_accepts_declared_sections() {
        let schema: ToolSchema = serde_json::from_value(json!({
            "id": ids::BOWTIE2,
            "inputs": [
                {"name": "library", "type": "conditional"},
                {"name": "reference_genome", "type": "conditional"},
                {"name": "analysis_type", "type": "conditional"}
            ]
        }))
        .unwrap();

        let inputs = Bowtie2Params {
            r1: hda("r1"),
            r2: hda("r2"),
            reference: hda("ref"),
        }
        .into_inputs();

        assert!(validate_inputs(ids::BOWTIE2, &inputs, &schema).is_ok());
    }

    #[test]
    fn test_validate_inputs_rejects_undeclared_parameter() {
        let schema: ToolSchema = serde_json::from_value(json!({
            "id": ids::FASTQC,
            "inputs": [{"name": "input_file", "type": "data"}]
        }))
        .unwrap();

        let inputs = json!({"input_file": hda("d1"), "bogus": 1});
        let err = validate_inputs(ids::FASTQC, &inputs, &schema).unwrap_err();
        match err {
            PipelineError::UnknownParameter { name, .. } => assert_eq!(name, "bogus"),
            other => panic!("expected unknown-parameter error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_inputs_skips_empty_schema() {
        let schema: ToolSchema =
            serde_json::from_value(json!({"id": ids::FASTQC, "inputs": []})).unwrap();
        let inputs = json!({"anything": 1});
        assert!(validate_inputs(ids::FASTQC, &inputs, &schema).is_ok());
    }
}
