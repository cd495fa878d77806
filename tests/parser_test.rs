//! Integration tests for input parsing.

use formulario::parser::{parse, parse_legacy, parse_section_tables};
use formulario::{detect_format, InputFormat};

const SHEET: &str = r"### Cinemática

| Concepto | Fórmula Simbólica | Fórmula en Texto | Unidad (SI) |
|---|---|---|---|
| Velocidad media | v = \Delta x / \Delta t | velocidad = desplazamiento / tiempo | m/s |
| Aceleración | a = \Delta v / \Delta t | aceleración = cambio de velocidad / tiempo | m/s^2 |

Notas del profesor: repasar antes del examen.

### Dinámica

| Concepto | Fórmula Simbólica | Variables | Unidad (SI) |
|---|---|---|---|
| Segunda ley | F = m a | F: fuerza (N), m: masa (kg) | N |
| Peso | P = m g | m: masa, g: gravedad | N |
| Rozamiento | f = \mu N | \mu: coeficiente, N: normal | N |
";

const LEGACY: &str = "Concepto;Fórmula;Unidades\nPeso;P=mg;N\nTrabajo;W=Fd;J\n";

#[test]
fn test_realistic_sheet_parses_in_order() {
    let sections = parse(SHEET);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Cinemática");
    assert_eq!(sections[0].rows.len(), 2);
    assert_eq!(sections[1].title, "Dinámica");
    assert_eq!(sections[1].rows.len(), 3);

    let first = &sections[0].rows[0];
    assert_eq!(first.get("Concepto"), Some("Velocidad media"));
    assert_eq!(first.get("Fórmula Simbólica"), Some(r"v = \Delta x / \Delta t"));
    assert_eq!(first.get("Unidad (SI)"), Some("m/s"));
}

#[test]
fn test_every_row_carries_every_header_key() {
    for section in parse(SHEET) {
        let header: Vec<String> = section.rows[0]
            .columns()
            .map(|column| column.to_string())
            .collect();
        for row in &section.rows {
            assert_eq!(row.len(), header.len());
            for column in &header {
                assert!(row.get(column).is_some(), "missing key {column}");
            }
        }
    }
}

#[test]
fn test_detection_selects_grammar_per_input() {
    assert_eq!(detect_format(SHEET), InputFormat::SectionTables);
    assert_eq!(detect_format(LEGACY), InputFormat::LegacyDelimited);

    assert_eq!(parse(SHEET), parse_section_tables(SHEET));
    assert_eq!(parse(LEGACY), parse_legacy(LEGACY));
}

#[test]
fn test_legacy_sheet_is_one_untitled_section() {
    let sections = parse(LEGACY);

    assert_eq!(sections.len(), 1);
    assert!(!sections[0].has_title());
    assert_eq!(sections[0].rows.len(), 2);
    assert_eq!(sections[0].rows[0].get("Concepto"), Some("Peso"));
    assert_eq!(sections[0].rows[1].get("Fórmula"), Some("W=Fd"));
}

#[test]
fn test_mixed_arity_rows_fit_the_header() {
    let input = "### Mixta\n| A | B | C |\n| 1 | 2 |\n| 4 | 5 | 6 | 7 |\n";
    let sections = parse(input);

    assert_eq!(sections.len(), 1);
    let rows = &sections[0].rows;
    assert_eq!(rows[0].get("C"), Some(""));
    assert_eq!(rows[1].get("C"), Some("6"));
    assert_eq!(rows[1].len(), 3);
}

#[test]
fn test_heading_titles_are_trimmed() {
    let input = "###   Trabajo y Energía  \n| A | B |\n| 1 | 2 |\n";
    let sections = parse(input);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Trabajo y Energía");
}

#[test]
fn test_unreadable_inputs_yield_no_sections() {
    assert!(parse("").is_empty());
    assert!(parse("una sola línea de prosa").is_empty());
    assert!(parse("### Título sin tabla").is_empty());
}

#[test]
fn test_headings_without_rows_are_dropped() {
    let input = "### Vacía\n\n### Llena\n| A | B |\n| 1 | 2 |\n### Colgante\n";
    let sections = parse(input);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, "Llena");
}
