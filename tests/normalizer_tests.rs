// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgersweep::normalizer::{MARKER_PHRASE, contains_marker, normalize_concept};

const SAMPLES: &[&str] = &[
    "",
    "   ",
    "TRANSFERENCIA RECIBIDA",
    "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento",
    "PAGO COMUNIDAD\nPulsa para ver detalle del movimiento\nmas texto",
    "Pulsa para ver detalle del movimiento",
    "RECIBO LUZ\n\n  ENDESA   Pulsa para ver detalle del movimiento\n",
    "BIZUM\nPULSA PARA VER DETALLE DEL MOVIMIENTO",
    "Pulsa para ver\ndetalle del movimiento",
    "Pulsa para\nPulsa para ver detalle del movimiento\nver detalle del movimiento",
    "A\r\nB\tC",
    "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento\n\n",
    "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento\n  ",
];

#[test]
fn strips_trailing_marker() {
    assert_eq!(
        normalize_concept("TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento"),
        "TRANSFERENCIA RECIBIDA"
    );
}

#[test]
fn strips_marker_followed_by_blank_lines() {
    for raw in [
        "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento\n\n",
        "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento\n  ",
        "TRANSFERENCIA RECIBIDA Pulsa para ver detalle del movimiento  \r\n\t",
    ] {
        assert_eq!(normalize_concept(raw), "TRANSFERENCIA RECIBIDA", "for {:?}", raw);
    }
}

#[test]
fn strips_marker_on_its_own_line() {
    let out =
        normalize_concept("PAGO COMUNIDAD\nPulsa para ver detalle del movimiento\nmas texto");
    assert_eq!(out, "PAGO COMUNIDAD mas texto");
    assert!(!contains_marker(&out));
}

#[test]
fn marker_match_ignores_case() {
    assert_eq!(
        normalize_concept("BIZUM ALQUILER pulsa PARA ver DETALLE del movimiento"),
        "BIZUM ALQUILER"
    );
}

#[test]
fn marker_wrapped_across_lines_is_removed() {
    let out = normalize_concept("RECIBO AGUA Pulsa para ver\ndetalle del movimiento");
    assert_eq!(out, "RECIBO AGUA");
}

#[test]
fn collapses_newlines_and_whitespace() {
    assert_eq!(
        normalize_concept("  RECIBO LUZ\n\n  ENDESA   Pulsa para ver detalle del movimiento\n"),
        "RECIBO LUZ ENDESA"
    );
}

#[test]
fn clean_text_is_left_alone() {
    for c in ["TRANSFERENCIA RECIBIDA", "pago de ibi municipal", "X"] {
        assert_eq!(normalize_concept(c), c);
    }
}

#[test]
fn empty_input_passes_through() {
    assert_eq!(normalize_concept(""), "");
}

#[test]
fn marker_only_concept_is_kept() {
    assert_eq!(normalize_concept(MARKER_PHRASE), MARKER_PHRASE);
    assert_eq!(normalize_concept("  \n "), "  \n ");
}

#[test]
fn never_empties_non_empty_input() {
    for c in SAMPLES.iter().filter(|c| !c.is_empty()) {
        assert!(!normalize_concept(c).is_empty(), "emptied {:?}", c);
    }
}

#[test]
fn normalization_is_idempotent() {
    for c in SAMPLES {
        let once = normalize_concept(c);
        assert_eq!(normalize_concept(&once), once, "not stable for {:?}", c);
    }
}

#[test]
fn changed_output_never_contains_marker() {
    for c in SAMPLES {
        let out = normalize_concept(c);
        if out != *c {
            assert!(!contains_marker(&out), "marker left in {:?}", out);
        }
    }
}
