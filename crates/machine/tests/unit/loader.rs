//! Program image parser and loader tests.

use coopsim_core::{Config, LoadError, Machine, ProgramImage};
use pretty_assertions::assert_eq;

const GOOD_IMAGE: &str = "\
# scratch program
Begin Data Section
0 10        # initial PC
1 1900      # initial SP

500 42
End Data Section
Begin Instruction Section
10 SET 7 1500   # first instruction
11 HLT
End Instruction Section
trailing commentary is ignored
";

#[test]
fn parses_data_and_instructions() {
    let image = ProgramImage::parse_str(GOOD_IMAGE).unwrap();
    assert_eq!(image.data().to_vec(), vec![(0, 10), (1, 1900), (500, 42)]);
    assert_eq!(image.instructions().len(), 2);
    assert_eq!(image.instructions()[&10], "SET 7 1500");
    assert_eq!(image.instructions()[&11], "HLT");
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let image = ProgramImage::parse_str(GOOD_IMAGE).unwrap();
    // The comment-only and blank lines contribute nothing.
    assert_eq!(image.data().len(), 3);
}

#[test]
fn load_populates_machine_memory() {
    let image = ProgramImage::parse_str(GOOD_IMAGE).unwrap();
    let mut machine = Machine::new(&Config::default());
    image.load_into(&mut machine).unwrap();

    assert_eq!(machine.read_data(0).unwrap(), 10);
    assert_eq!(machine.read_data(500).unwrap(), 42);
    assert_eq!(machine.cell(10).unwrap().as_code(), Some("SET 7 1500"));
}

#[test]
fn instructions_take_priority_over_data_at_the_same_address() {
    let source = "\
Begin Data Section
10 999
End Data Section
Begin Instruction Section
10 HLT
End Instruction Section
";
    let image = ProgramImage::parse_str(source).unwrap();
    let mut machine = Machine::new(&Config::default());
    image.load_into(&mut machine).unwrap();
    assert_eq!(machine.cell(10).unwrap().as_code(), Some("HLT"));
}

#[test]
fn missing_data_section_is_an_error() {
    let source = "Begin Instruction Section\n10 HLT\nEnd Instruction Section\n";
    assert!(matches!(
        ProgramImage::parse_str(source),
        Err(LoadError::MissingSection("Data"))
    ));
}

#[test]
fn unterminated_data_section_is_an_error() {
    let source = "Begin Data Section\n0 10\n";
    assert!(matches!(
        ProgramImage::parse_str(source),
        Err(LoadError::MissingSection("Data"))
    ));
}

#[test]
fn missing_instruction_section_is_an_error() {
    let source = "Begin Data Section\n0 10\nEnd Data Section\n";
    assert!(matches!(
        ProgramImage::parse_str(source),
        Err(LoadError::MissingSection("Instruction"))
    ));
}

#[test]
fn non_integer_data_value_is_an_error() {
    let source = "\
Begin Data Section
0 ten
End Data Section
Begin Instruction Section
10 HLT
End Instruction Section
";
    assert!(matches!(
        ProgramImage::parse_str(source),
        Err(LoadError::Malformed { line: 2, .. })
    ));
}

#[test]
fn instruction_line_without_text_is_an_error() {
    let source = "\
Begin Data Section
End Data Section
Begin Instruction Section
10
End Instruction Section
";
    assert!(matches!(
        ProgramImage::parse_str(source),
        Err(LoadError::Malformed { line: 4, .. })
    ));
}

#[test]
fn image_address_past_capacity_is_a_load_error() {
    let source = "\
Begin Data Section
60 1
End Data Section
Begin Instruction Section
10 HLT
End Instruction Section
";
    let image = ProgramImage::parse_str(source).unwrap();
    let mut config = Config::default();
    config.machine.memory_words = 50;
    let mut machine = Machine::new(&config);
    assert!(matches!(
        image.load_into(&mut machine),
        Err(LoadError::AddressOutOfRange { addr: 60, capacity: 50 })
    ));
}
