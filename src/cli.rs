use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clipspec", about = "Batch acoustic feature extraction for audio clip datasets")]
pub struct Cli {
    /// Input directory containing audio clips (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output directory for feature images
    #[arg(short, long, default_value = "features")]
    pub output: PathBuf,

    /// Config file path (defaults to clipspec.toml or the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Worker threads (0 = one per CPU core)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Also write the numeric feature bundle as a JSON sidecar per clip
    #[arg(long)]
    pub json: bool,

    /// Pre-emphasis coefficient
    #[arg(long, default_value_t = 0.5)]
    pub pre_emphasis: f32,

    /// STFT analysis window length in samples
    #[arg(long, default_value_t = 2048)]
    pub frame_size: usize,

    /// STFT hop length in samples
    #[arg(long, default_value_t = 512)]
    pub hop_size: usize,

    /// Number of mel filterbank bands
    #[arg(long, default_value_t = 128)]
    pub mel_bands: usize,

    /// Number of leading MFCC coefficients to keep
    #[arg(long, default_value_t = 1)]
    pub mfcc_coeffs: usize,

    /// Linear prediction order
    #[arg(long, default_value_t = 12)]
    pub lpc_order: usize,

    /// Number of constant-Q frequency bins
    #[arg(long, default_value_t = 6)]
    pub cqt_bins: usize,

    /// Constant-Q hop length in samples
    #[arg(long, default_value_t = 2048)]
    pub cqt_hop: usize,

    /// Number of CQCC coefficients to keep
    #[arg(long, default_value_t = 6)]
    pub cqcc_coeffs: usize,

    /// Lower bound of the pitch search band, Hz
    #[arg(long, default_value_t = 150.0)]
    pub pitch_fmin: f32,

    /// Upper bound of the pitch search band, Hz
    #[arg(long, default_value_t = 4000.0)]
    pub pitch_fmax: f32,
}
