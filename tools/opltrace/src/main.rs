//! opltrace - run OPL2 driver operations against a recording bus and print
//! the register writes they produce.

mod trace;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use opl2::demo::run_scale_demo;
use opl2::{Drums, FrequencyWord, Instrument, Note, Opl2, Voice};
use tracing::{Level, info};
use tracing_subscriber::util::SubscriberInitExt;

use crate::trace::{Format, TraceBus, print_trace};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for the trace.
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// Log more (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Chip reset
    Reset,

    /// Chip reset followed by rhythm mode setup
    Rhythm,

    /// Start-up sequence, an optional drum hit, then one note
    Note {
        /// Semitone index, 0 = C ... 11 = B
        #[arg(long, default_value_t = 9)]
        note: u8,

        /// Octave block, 0-7
        #[arg(long, default_value_t = 3)]
        block: u8,

        /// Voice, 0-5
        #[arg(long, default_value_t = 0)]
        voice: u8,

        /// Drums to trigger before the note
        #[arg(long = "drum", value_enum)]
        drums: Vec<Drum>,
    },

    /// The scale demo: every semitone of one block with a snare on each
    Demo {
        /// Octave block, 0-7
        #[arg(long, default_value_t = 4)]
        block: u8,

        /// Voice, 0-5
        #[arg(long, default_value_t = 0)]
        voice: u8,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Drum {
    BassDrum,
    Snare,
    TomTom,
    Cymbal,
    HiHat,
}

impl From<Drum> for Drums {
    fn from(drum: Drum) -> Self {
        match drum {
            Drum::BassDrum => Drums::BASS_DRUM,
            Drum::Snare => Drums::SNARE,
            Drum::TomTom => Drums::TOM_TOM,
            Drum::Cymbal => Drums::CYMBAL,
            Drum::HiHat => Drums::HI_HAT,
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .init();
}

fn startup(opl: &mut Opl2<TraceBus>) -> Result<()> {
    opl.reset();
    opl.enable_rhythm_mode();
    for voice in Voice::ALL {
        opl.program_instrument(&Instrument::DEMO, voice)
            .with_context(|| format!("programming voice {}", voice.index()))?;
    }
    Ok(())
}

fn run(command: Commands, opl: &mut Opl2<TraceBus>) -> Result<()> {
    match command {
        Commands::Reset => opl.reset(),
        Commands::Rhythm => {
            opl.reset();
            opl.enable_rhythm_mode();
        }
        Commands::Note {
            note,
            block,
            voice,
            drums,
        } => {
            let note = Note::from_index(note).context("invalid --note")?;
            let word = FrequencyWord::from_note(note, block).context("invalid --block")?;
            let voice = Voice::new(voice).context("invalid --voice")?;
            let drums = drums.into_iter().fold(Drums::empty(), |acc, d| acc | Drums::from(d));

            startup(opl)?;
            if !drums.is_empty() {
                opl.trigger_percussion(drums);
            }
            info!("playing {:?} (${:04X}) on voice {}", note, word.raw(), voice.index());
            opl.play_note(word, voice);
        }
        Commands::Demo { block, voice } => {
            let voice = Voice::new(voice).context("invalid --voice")?;
            run_scale_demo(opl, block, voice, |ms| info!("delay {}ms", ms))
                .context("running scale demo")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut opl = Opl2::new(TraceBus::new());
    run(cli.command, &mut opl)?;

    let bus = opl.into_bus();
    if bus.overflowed() {
        bail!("trace exceeded {} writes", bus.writes().len());
    }
    print_trace(&mut std::io::stdout().lock(), bus.writes(), cli.format)?;
    Ok(())
}
