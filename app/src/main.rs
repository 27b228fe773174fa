use clap::Parser;
use clavier_computer_keyboard::Octave;
use clavier_controller::Controller;
use clavier_midi::{
    MidiEvents,
    general_midi::{find_instrument, instrument_name},
    midly::num::u7,
};
use clavier_midi_out::{MidiOut, enumerate_port_names};
use clavier_widgets::Piano;

#[derive(Parser)]
#[command(name = "clavier")]
#[command(about = "Play a midi device with the computer keyboard. The keys \
Q2W3ER5T6Y7UI9O0P play notes, comma and period change octave, and escape \
quits.")]
struct Cli {
    /// Open the first midi output port whose name contains this (case insensitive). Defaults to
    /// the first port.
    #[arg(short, long)]
    port: Option<String>,
    /// List the available midi output ports and exit.
    #[arg(long)]
    list_ports: bool,
    #[arg(
        short,
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=10)
    )]
    octave: u8,
    /// General MIDI program number of the initial instrument.
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=127),
        conflicts_with = "instrument"
    )]
    program: u8,
    /// Choose the initial instrument by (part of) its name instead of its program number.
    #[arg(short, long)]
    instrument: Option<String>,
    #[arg(short, long, default_value = "Keyboard")]
    title: String,
}

impl Cli {
    fn initial_program(&self) -> anyhow::Result<u7> {
        match self.instrument.as_ref() {
            Some(query) => find_instrument(query).ok_or_else(|| {
                anyhow::anyhow!("no instrument matching \"{query}\"")
            }),
            None => Ok(self.program.into()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.list_ports {
        for (i, name) in enumerate_port_names()? {
            println!("{}: {}", i, name);
        }
        return Ok(());
    }
    let octave = Octave::new(cli.octave)
        .ok_or_else(|| anyhow::anyhow!("octave out of range: {}", cli.octave))?;
    let program = cli.initial_program()?;
    log::info!("initial instrument: {}", instrument_name(program));
    let mut piano =
        Piano::new(cli.title.as_str(), Controller::new(octave, program))?;
    let mut midi_out = MidiOut::open(cli.port.as_deref()).unwrap_or_else(|e| {
        log::error!("{e}");
        MidiOut::disconnected()
    });
    let mut buf = MidiEvents::empty();
    piano.startup(&mut buf);
    for event in buf.iter() {
        midi_out.send_(event);
    }
    while !piano.quit_requested() {
        piano.tick(&mut buf)?;
        for event in buf.iter() {
            midi_out.send_(event);
        }
    }
    piano.shutdown(&mut buf);
    for event in buf.iter() {
        midi_out.send_(event);
    }
    midi_out.close();
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn initial_program(args: &[&str]) -> anyhow::Result<u7> {
        let cli = Cli::try_parse_from(
            std::iter::once("clavier").chain(args.iter().cloned()),
        )?;
        cli.initial_program()
    }

    #[test]
    fn default_program_is_piano() {
        assert_eq!(initial_program(&[]).unwrap(), u7::from(0));
    }

    #[test]
    fn program_by_number() {
        assert_eq!(
            initial_program(&["--program", "19"]).unwrap(),
            u7::from(19)
        );
        assert!(initial_program(&["--program", "128"]).is_err());
    }

    #[test]
    fn instrument_by_name() {
        assert_eq!(
            initial_program(&["--instrument", "violin"]).unwrap(),
            u7::from(40)
        );
        assert!(initial_program(&["-i", "kazoo"]).is_err());
    }

    #[test]
    fn program_and_instrument_conflict() {
        assert!(
            initial_program(&["--program", "3", "--instrument", "violin"])
                .is_err()
        );
    }
}
