//! Engine configuration: serialization and build-time validation.

mod helpers;

use helpers::*;
use retune::midi::Error as MidiError;
use retune::prelude::*;

#[test]
fn test_config_bincode_round_trip() {
    let config = RetuneConfig {
        system: IntonationSystem::Pythagorean,
        pitch_bend_range: PitchBendRange::new(12, 50),
        channels: vec![0, 1, 2, 10, 15],
    };

    let bytes = bincode::serialize(&config).unwrap();
    let decoded: RetuneConfig = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, config);
}

#[test]
fn test_default_config_builds_default_engine() {
    let engine = RetuneEngine::from_config(RetuneConfig::default()).unwrap();
    assert_eq!(engine.system(), IntonationSystem::Diatonic);
    assert_eq!(engine.channels(), ChannelSet::retuning());
    assert!(engine.current_key().is_none());
}

#[test]
fn test_config_range_reaches_rpn() {
    let config = RetuneConfig {
        pitch_bend_range: PitchBendRange::new(1, 25),
        channels: vec![4, 5],
        ..RetuneConfig::default()
    };
    let mut engine = RetuneEngine::builder()
        .config(config)
        .tonic(Note::natural(Letter::C))
        .build()
        .unwrap();

    let messages = engine.note_on(E4, 100).unwrap();
    assert_eq!(messages[2].as_bytes(), &[0xB4, 0x06, 1]);
    assert_eq!(messages[3].as_bytes(), &[0xB4, 0x26, 25]);
}

#[test]
fn test_reserved_channel_rejected_at_build() {
    let result = RetuneEngine::builder().channels([0, 9]).build();
    assert!(matches!(
        result,
        Err(retune::Error::Midi(MidiError::ReservedChannel(9)))
    ));
}

#[test]
fn test_out_of_range_channel_rejected_at_build() {
    let config = RetuneConfig {
        channels: vec![3, 16],
        ..RetuneConfig::default()
    };
    assert!(matches!(
        RetuneEngine::from_config(config),
        Err(retune::Error::Midi(MidiError::InvalidChannel(16)))
    ));
}

#[test]
fn test_empty_channel_list_rejected_at_build() {
    let result = RetuneEngine::builder().channels(std::iter::empty()).build();
    assert!(matches!(result, Err(retune::Error::Midi(MidiError::NoChannels))));
}

#[test]
fn test_builder_overrides_config_fields() {
    let engine = RetuneEngine::builder()
        .config(RetuneConfig::default())
        .system(IntonationSystem::EqualTemperament)
        .channels([7])
        .build()
        .unwrap();
    assert_eq!(engine.system(), IntonationSystem::EqualTemperament);
    assert_eq!(engine.channels().iter().collect::<Vec<_>>(), vec![7]);
}

#[test]
fn test_supplied_machine_fixes_system() {
    let machine = KeyStateMachine::new(IntonationSystem::Pythagorean);
    let engine = RetuneEngine::builder()
        .system(IntonationSystem::Diatonic)
        .machine(machine)
        .build()
        .unwrap();
    assert_eq!(engine.system(), IntonationSystem::Pythagorean);
}

#[test]
fn test_deserialized_range_rejected_at_build() {
    // Bypasses PitchBendRange::new, as a config file would
    let bad = RetuneConfig {
        pitch_bend_range: PitchBendRange {
            semitones: 3,
            cents: 150,
        },
        ..RetuneConfig::default()
    };
    let bytes = bincode::serialize(&bad).unwrap();
    let config: RetuneConfig = bincode::deserialize(&bytes).unwrap();

    assert!(matches!(
        RetuneEngine::from_config(config),
        Err(retune::Error::Midi(MidiError::InvalidRange {
            semitones: 3,
            cents: 150
        }))
    ));

    let result = RetuneEngine::builder()
        .pitch_bend_range(PitchBendRange {
            semitones: 200,
            cents: 0,
        })
        .build();
    assert!(matches!(
        result,
        Err(retune::Error::Midi(MidiError::InvalidRange { semitones: 200, .. }))
    ));
}

#[test]
fn test_runtime_range_change_is_validated() {
    let mut engine = RetuneEngine::builder()
        .tonic(Note::natural(Letter::C))
        .build()
        .unwrap();
    let bad = PitchBendRange {
        semitones: 1,
        cents: 100,
    };
    assert!(engine.set_pitch_bend_range(0, bad).is_err());

    // The channel keeps its configured range
    let messages = engine.note_on(E4, 100).unwrap();
    assert_eq!(messages[2].as_bytes(), &[0xB0, 0x06, 2]);
    assert_eq!(messages[3].as_bytes(), &[0xB0, 0x26, 0]);
}
