use cartdb_query::schema::*;

#[test]
fn join_graph_is_fixed() {
    let edges: Vec<(&str, &str, JoinKind)> = join_graph()
        .iter()
        .map(|e| (e.left.name, e.right.name, e.kind))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("game", "cartridge", JoinKind::Inner),
            ("cartridge", "board", JoinKind::Inner),
            ("board", "prg", JoinKind::LeftOuter),
            ("board", "chr", JoinKind::LeftOuter),
            ("board", "vram", JoinKind::LeftOuter),
            ("board", "wram", JoinKind::LeftOuter),
            ("board", "chip", JoinKind::LeftOuter),
        ]
    );
}

#[test]
fn join_graph_is_a_tree_rooted_at_game() {
    let mut joined = vec![root_table().name];
    for edge in join_graph() {
        assert!(
            joined.contains(&edge.left.name),
            "{} joined before {}",
            edge.right.name,
            edge.left.name
        );
        assert!(
            !joined.contains(&edge.right.name),
            "{} joined twice",
            edge.right.name
        );
        assert!(edge.left.has_column(edge.left_column));
        assert!(edge.right.has_column(edge.right_column));
        joined.push(edge.right.name);
    }
    assert_eq!(joined.len(), tables().len());
}

#[test]
fn base_columns_in_output_order() {
    let aliases: Vec<&str> = base_columns().iter().map(|c| c.output_name()).collect();
    assert_eq!(
        aliases,
        vec![
            "game_name",
            "region",
            "mapper",
            "board_type",
            "prg_name",
            "prg_size",
            "chr_name",
            "chr_size",
            "vram_size",
            "wram_size",
            "battery",
        ]
    );
}

#[test]
fn static_columns_reference_join_graph_tables() {
    let mut columns = base_columns().to_vec();
    columns.push(optional_column(CHIP_TYPE).unwrap());
    columns.extend(all_columns());
    for column in columns {
        let checked = ColumnRef::new(column.table(), column.column(), column.alias());
        assert_eq!(checked, Ok(column), "{column} is not in the join graph");
    }
}

#[test]
fn identifiers_are_plain() {
    let plain = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase() || b == b'_');
    for table in tables() {
        assert!(plain(table.name), "table {}", table.name);
        for column in table.columns {
            assert!(plain(column), "column {}.{}", table.name, column);
        }
    }
    for column in base_columns() {
        assert!(plain(column.output_name()));
    }
}

#[test]
fn optional_column_lookup() {
    let chip = optional_column("chip_type").unwrap();
    assert_eq!(chip.qualified(), "chip.type");
    assert_eq!(chip.select_item(), "chip.type AS chip_type");

    assert_eq!(
        optional_column("pcb"),
        Err(ColumnError::NotFound("pcb".to_string()))
    );
}

#[test]
fn resolve_by_alias_and_qualified_name() {
    assert_eq!(resolve_column("prg_size").unwrap().qualified(), "prg.size");
    assert_eq!(resolve_column("mapper").unwrap().qualified(), "board.mapper");
    assert_eq!(resolve_column("chip_type").unwrap().qualified(), "chip.type");
    assert_eq!(resolve_column("board.type").unwrap().qualified(), "board.type");
    assert_eq!(resolve_column("Game.Name").unwrap().qualified(), "game.name");
    // Columns outside the projection still resolve.
    assert_eq!(resolve_column("cartridge.id").unwrap().qualified(), "cartridge.id");
}

#[test]
fn resolve_rejects_unknown_names() {
    for name in [
        "nonexistent_col",
        "board.nonexistent",
        "device.type",
        "game.name; DROP TABLE game",
        "",
        "size",
    ] {
        assert_eq!(
            resolve_column(name),
            Err(ColumnError::UnknownColumn(name.to_string())),
            "{name:?} should not resolve"
        );
    }
}

#[test]
fn all_columns_cover_every_table() {
    let columns = all_columns();
    let total: usize = tables().iter().map(|t| t.columns.len()).sum();
    assert_eq!(columns.len(), total);
    assert_eq!(columns[0].qualified(), "game.id");
    assert!(columns.iter().all(|c| c.alias().is_none()));
}
