// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn render_to_string(table: &Table) -> String {
    let mut buf = Vec::new();
    table.render(&mut buf);
    String::from_utf8(buf).unwrap()
}

#[test]
fn empty_table_prints_nothing() {
    let table = Table::plain(vec![Column::left("NAME"), Column::state("STATE")]);
    assert_eq!(render_to_string(&table), "");
}

#[test]
fn columns_pad_to_widest_cell_except_last() {
    let mut table = Table::plain(vec![Column::left("NAME"), Column::left("STATE")]);
    table.row(vec!["agent-fix-login".into(), "idle".into()]);
    table.row(vec!["agent-a".into(), "running".into()]);
    let out = render_to_string(&table);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "NAME             STATE");
    assert_eq!(lines[1], "agent-fix-login  idle");
    assert_eq!(lines[2], "agent-a          running");
}

#[test]
fn right_aligned_non_last_column() {
    let mut table = Table::plain(vec![
        Column::left("NAME"),
        Column::right("AGE"),
        Column::left("STATE"),
    ]);
    table.row(vec!["alpha".into(), "5s".into(), "idle".into()]);
    table.row(vec!["beta".into(), "2h 05m".into(), "running".into()]);
    let out = render_to_string(&table);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "NAME      AGE  STATE");
    assert_eq!(lines[1], "alpha      5s  idle");
    assert_eq!(lines[2], "beta   2h 05m  running");
}

#[test]
fn max_width_truncates_long_values() {
    let mut table = Table::plain(vec![Column::left("ID").with_max(4), Column::left("NAME")]);
    table.row(vec!["abcdef".into(), "test".into()]);
    let out = render_to_string(&table);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[1], "abcd  test");
}

#[test]
fn truncation_respects_char_boundaries() {
    let mut table = Table::plain(vec![Column::left("PROMPT").with_max(3)]);
    table.row(vec!["añadir tests".into()]);
    let out = render_to_string(&table);

    assert_eq!(out.lines().nth(1), Some("aña"));
}

#[test]
fn min_width_enforces_minimum() {
    let mut table = Table::plain(vec![
        {
            let mut c = Column::left("X");
            c.min_width = Some(10);
            c
        },
        Column::left("Y"),
    ]);
    table.row(vec!["a".into(), "b".into()]);
    let out = render_to_string(&table);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "X           Y");
    assert_eq!(lines[1], "a           b");
}

#[test]
fn missing_cells_render_blank() {
    let mut table = Table::plain(vec![Column::left("A"), Column::left("B")]);
    table.row(vec!["only".into()]);
    let out = render_to_string(&table);

    assert_eq!(out.lines().nth(1), Some("only  "));
}

#[test]
fn state_style_colors_after_padding() {
    let mut table = Table::colored(vec![Column::state("STATE"), Column::left("NAME")]);
    table.row(vec!["idle".into(), "agent-a".into()]);
    let out = render_to_string(&table);

    assert!(
        out.contains("\x1b[33midle \x1b[0m"),
        "padding should sit inside the color span: {:?}",
        out
    );
}

#[test]
fn muted_style_applies_ansi_when_color_enabled() {
    let mut table = Table::colored(vec![Column::muted("PROJECT")]);
    table.row(vec!["/work/app".into()]);
    let out = render_to_string(&table);

    assert!(out.contains("\x1b[38;5;240m/work/app\x1b[0m"), "{:?}", out);
}

#[test]
fn no_ansi_when_no_color() {
    let mut table = Table::plain(vec![Column::muted("PROJECT"), Column::state("STATE")]);
    table.row(vec!["/work/app".into(), "running".into()]);
    let out = render_to_string(&table);

    assert!(!out.contains("\x1b["), "{:?}", out);
}
