use clavier_midi::MidiEvent;
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};

const CLIENT_NAME: &str = "clavier";

/// A connection to a midi output port. If no port could be opened then events sent to it are
/// dropped, so the keyboard stays usable (if silent) without a midi device.
pub struct MidiOut {
    connection: Option<MidiOutputConnection>,
    port_name: Option<String>,
}

/// Pick the port to open. With no query this is the first port, which is the closest thing to a
/// default device that midir exposes. Otherwise it's the first port whose name contains the
/// query, ignoring case.
fn choose_port(port_names: &[String], query: Option<&str>) -> Option<usize> {
    match query {
        None => (!port_names.is_empty()).then_some(0),
        Some(query) => {
            let query = query.to_lowercase();
            port_names
                .iter()
                .position(|name| name.to_lowercase().contains(query.as_str()))
        }
    }
}

fn port_names(
    midi_output: &MidiOutput,
    ports: &[MidiOutputPort],
) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::with_capacity(ports.len());
    for port in ports {
        names.push(midi_output.port_name(port)?);
    }
    Ok(names)
}

/// Returns the index and name of every available midi output port.
pub fn enumerate_port_names() -> anyhow::Result<Vec<(usize, String)>> {
    let midi_output = MidiOutput::new(CLIENT_NAME)?;
    let ports = midi_output.ports();
    Ok(port_names(&midi_output, &ports)?
        .into_iter()
        .enumerate()
        .collect())
}

impl MidiOut {
    /// Connect to a midi output port. See `choose_port` for how the port is chosen when there is
    /// more than one.
    pub fn open(port_query: Option<&str>) -> anyhow::Result<Self> {
        let midi_output = MidiOutput::new(CLIENT_NAME)?;
        let ports = midi_output.ports();
        let names = port_names(&midi_output, &ports)?;
        for (i, name) in names.iter().enumerate() {
            log::info!("midi output port {}: {}", i, name);
        }
        let Some(index) = choose_port(&names, port_query) else {
            match port_query {
                Some(query) => {
                    anyhow::bail!("no midi output port matching \"{query}\"")
                }
                None => anyhow::bail!("no midi output ports available"),
            }
        };
        let port_name = names[index].clone();
        let connection = midi_output
            .connect(&ports[index], CLIENT_NAME)
            .map_err(|_| {
                anyhow::anyhow!("Failed to connect to midi port {port_name}")
            })?;
        log::info!("connected to midi output port: {}", port_name);
        Ok(Self {
            connection: Some(connection),
            port_name: Some(port_name),
        })
    }

    /// An output that drops every event.
    pub fn disconnected() -> Self {
        Self {
            connection: None,
            port_name: None,
        }
    }

    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }

    pub fn send(&mut self, event: &MidiEvent) -> anyhow::Result<()> {
        let bytes = event.to_bytes()?;
        match self.connection.as_mut() {
            Some(connection) => {
                log::debug!(
                    "sending {:?} (short message {:06X})",
                    event,
                    event.to_short_message()?
                );
                connection
                    .send(&bytes)
                    .map_err(|e| anyhow::anyhow!("{e}"))?;
            }
            None => log::debug!("no midi output, dropping {:?}", event),
        }
        Ok(())
    }

    /// Like `send` but logs a warning on failure rather than returning an error value.
    pub fn send_(&mut self, event: &MidiEvent) {
        if let Err(e) = self.send(event) {
            log::warn!("Failed to send {:?}: {}", event, e);
        }
    }

    pub fn close(mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            if let Some(port_name) = self.port_name.as_ref() {
                log::info!("closed midi output port: {}", port_name);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn names() -> Vec<String> {
        vec![
            "Midi Through:Midi Through Port-0 14:0".to_string(),
            "FLUID Synth (1234):Synth input port (1234:0) 128:0".to_string(),
        ]
    }

    #[test]
    fn first_port_by_default() {
        assert_eq!(choose_port(&names(), None), Some(0));
    }

    #[test]
    fn port_by_substring() {
        assert_eq!(choose_port(&names(), Some("fluid")), Some(1));
        assert_eq!(choose_port(&names(), Some("timidity")), None);
    }

    #[test]
    fn no_ports() {
        assert_eq!(choose_port(&[], None), None);
        assert_eq!(choose_port(&[], Some("fluid")), None);
    }

    #[test]
    fn disconnected_drops_events() {
        let mut out = MidiOut::disconnected();
        let event = MidiEvent::note_on(0.into(), 60.into(), 127.into());
        assert!(out.send(&event).is_ok());
        assert_eq!(out.port_name(), None);
        out.close();
    }
}
