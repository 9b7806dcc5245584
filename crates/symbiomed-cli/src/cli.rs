use clap::{Parser, Subcommand, ValueEnum};
use symbiomed_core::{ClinicalStatus, EncounterClass, SearchScope, VerificationStatus};

#[derive(Parser)]
#[command(name = "symbiomed")]
#[command(about = "SymbioMed CLI: search NAMASTE codes, map them to ICD-11 TM2 and build dual-coded Conditions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and SYMBIOMED_URL env var)
    #[arg(short, long, global = true, env = "SYMBIOMED_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "SYMBIOMED_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Request timeout in seconds (no timeout unless set here or in config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    #[default]
    Text,
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search NAMASTE codes by term
    Search(SearchArgs),
    /// Search-as-you-type: read successive inputs from stdin, one per line
    Suggest(SuggestArgs),
    /// Show code details and its ICD-11 TM2 mappings
    Mapping(MappingArgs),
    /// CodeSystem $lookup
    Lookup(LookupArgs),
    /// ConceptMap $translate
    Translate(TranslateArgs),
    /// ValueSet $validate-code
    ValidateCode(ValidateCodeArgs),
    /// Fetch or upload FHIR Bundles
    Bundle(BundleArgs),
    /// Build problem-list Conditions
    Condition(ConditionArgs),
    /// Check server health
    Health,
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Search term
    pub term: String,
    /// Systems to search: all, ayurveda, siddha or unani
    #[arg(long, default_value = "ayurveda")]
    pub system: SearchScope,
    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(clap::Args)]
pub struct SuggestArgs {
    /// Systems to search: all, ayurveda, siddha or unani
    #[arg(long, default_value = "all")]
    pub system: SearchScope,
    /// Quiet period in milliseconds before a lookup is issued
    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,
}

#[derive(clap::Args)]
pub struct MappingArgs {
    /// NAMASTE code
    pub code: String,
    /// CodeSystem URL of the code (defaults to Ayurveda)
    #[arg(long)]
    pub system: Option<String>,
    /// Select the n-th mapping (1-based) and print a prefilled problem-list entry
    #[arg(long)]
    pub select: Option<usize>,
}

#[derive(clap::Args)]
pub struct LookupArgs {
    /// Code to look up
    pub code: String,
    /// CodeSystem URL
    #[arg(long, default_value = "http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda")]
    pub system: String,
}

#[derive(clap::Args)]
pub struct TranslateArgs {
    /// Source code
    pub code: String,
    /// ConceptMap URL
    #[arg(long, default_value = "urn:conceptmap:NAMASTE_TO_ICD11_TM2_MAPPING")]
    pub url: String,
    /// Source system
    #[arg(long, default_value = "urn:namaste")]
    pub source: String,
    /// Target system
    #[arg(long, default_value = "http://id.who.int/icd/entity")]
    pub target: String,
}

#[derive(clap::Args)]
pub struct ValidateCodeArgs {
    /// Code to validate
    pub code: String,
    /// ValueSet URL
    #[arg(long, default_value = "http://sih.gov.in/fhir/ValueSet/namaste-ayurveda")]
    pub url: String,
    /// CodeSystem URL
    #[arg(long, default_value = "http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda")]
    pub system: String,
    /// Send parameters as a JSON body instead of a query string
    #[arg(long)]
    pub post: bool,
}

#[derive(clap::Args)]
pub struct BundleArgs {
    #[command(subcommand)]
    pub command: BundleCommands,
}

#[derive(Subcommand)]
pub enum BundleCommands {
    /// Fetch the server's Bundle
    Get,
    /// Upload a Bundle
    Upload(UploadArgs),
}

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct ConditionArgs {
    #[command(subcommand)]
    pub command: ConditionCommands,
}

#[derive(Subcommand)]
pub enum ConditionCommands {
    /// Create a FHIR Condition (problem-list entry)
    Create(ConditionCreateArgs),
    /// Validate AYUSH / ICD-11 TM2 dual coding
    Validate(DualCodeArgs),
}

#[derive(clap::Args)]
pub struct ConditionCreateArgs {
    /// AYUSH code (required unless --file is given)
    #[arg(long, required_unless_present = "file")]
    pub code: Option<String>,
    /// AYUSH CodeSystem URL
    #[arg(long, default_value = "http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda")]
    pub system: String,
    /// ICD-11 TM2 code
    #[arg(long)]
    pub icd_code: Option<String>,
    /// ICD-11 system URL
    #[arg(long, requires = "icd_code")]
    pub icd_system: Option<String>,
    /// ICD-11 display text
    #[arg(long, requires = "icd_code")]
    pub icd_display: Option<String>,
    #[arg(long, default_value = "active")]
    pub clinical_status: ClinicalStatus,
    #[arg(long, default_value = "confirmed")]
    pub verification_status: VerificationStatus,
    #[arg(long, default_value = "AMB")]
    pub encounter_class: EncounterClass,
    /// Onset date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    pub onset_date: Option<String>,
    /// Read a complete problem-list entry from a JSON file
    #[arg(long, conflicts_with = "code")]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct DualCodeArgs {
    /// AYUSH code
    #[arg(long)]
    pub code: String,
    /// AYUSH CodeSystem URL
    #[arg(long, default_value = "http://sih.gov.in/fhir/CodeSystem/namaste-ayurveda")]
    pub system: String,
    /// ICD-11 TM2 code
    #[arg(long)]
    pub tm2_code: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format, timeout_secs)
    pub key: String,
    /// Value
    pub value: String,
}
