use cartdb_db::{QueryExecutor, SqliteExecutor, database_stats, open_database, open_memory};
use cartdb_import::{ImportProgress, LogProgress, SilentProgress, import_cartdb, parse_cartdb};
use cartdb_query::{FilterSet, QueryRequest};
use std::cell::RefCell;

const SAMPLE: &str = r#"<database>
  <game name="Kirby's Adventure" region="USA">
    <cartridge system="NES-NTSC">
      <board type="NES-TKROM" mapper="4">
        <prg size="512k"/>
        <chr size="256k"/>
        <wram size="8k" battery="1"/>
        <chip type="MMC3C"/>
      </board>
    </cartridge>
  </game>
  <game name="Super Mario Bros. 3" region="USA">
    <cartridge system="NES-NTSC">
      <board type="NES-TSROM" mapper="4">
        <prg size="256k"/>
        <chr size="128k"/>
        <wram size="8k"/>
        <chip type="MMC3B"/>
      </board>
    </cartridge>
  </game>
  <game name="Super Mario Bros." region="Japan">
    <cartridge system="Famicom">
      <board type="HVC-NROM-256K-02" mapper="0">
        <prg size="32k"/>
        <chr size="8k"/>
      </board>
    </cartridge>
  </game>
</database>"#;

fn names(result: &cartdb_db::QueryResult) -> Vec<String> {
    (0..result.len())
        .map(|i| result.value(i, "game_name").unwrap().to_string())
        .collect()
}

#[test]
fn import_counts_rows() {
    let conn = open_memory().unwrap();
    let db = parse_cartdb(SAMPLE.as_bytes()).unwrap();
    let stats = import_cartdb(&conn, &db, Some(&SilentProgress)).unwrap();

    assert_eq!(stats.games, 3);
    assert_eq!(stats.cartridges, 3);
    assert_eq!(stats.boards, 3);
    assert_eq!(stats.roms, 6);
    assert_eq!(stats.rams, 2);
    assert_eq!(stats.chips, 2);
    assert_eq!(stats.battery_boards, 1);

    let db_stats = database_stats(&conn).unwrap();
    assert_eq!(db_stats.games, 3);
    assert_eq!(db_stats.distinct_mappers, 2);
    assert_eq!(db_stats.battery_boards, 1);
}

#[test]
fn imported_rows_answer_searches() {
    let conn = open_memory().unwrap();
    let db = parse_cartdb(SAMPLE.as_bytes()).unwrap();
    import_cartdb(&conn, &db, Some(&LogProgress)).unwrap();
    let executor = SqliteExecutor::new(conn);

    let run = |filters: FilterSet| {
        let query = QueryRequest::new(filters).assemble().unwrap();
        executor.execute(&query).unwrap()
    };

    assert_eq!(
        names(&run(FilterSet::new().mapper(4))),
        vec!["Kirby's Adventure", "Super Mario Bros. 3"]
    );
    assert_eq!(
        names(&run(FilterSet::new().battery(true))),
        vec!["Kirby's Adventure"]
    );
    assert_eq!(
        names(&run(FilterSet::new().battery(false))),
        vec!["Super Mario Bros.", "Super Mario Bros. 3"]
    );
    assert_eq!(
        names(&run(FilterSet::new().region("japan"))),
        vec!["Super Mario Bros."]
    );
}

#[derive(Default)]
struct Recorder {
    games: RefCell<Vec<(usize, usize)>>,
    phases: RefCell<Vec<String>>,
    completed: RefCell<bool>,
}

impl ImportProgress for Recorder {
    fn on_game(&self, current: usize, total: usize, _name: &str) {
        self.games.borrow_mut().push((current, total));
    }
    fn on_phase(&self, message: &str) {
        self.phases.borrow_mut().push(message.to_string());
    }
    fn on_complete(&self, _message: &str) {
        *self.completed.borrow_mut() = true;
    }
}

#[test]
fn progress_sees_every_game() {
    let conn = open_memory().unwrap();
    let recorder = Recorder::default();
    let db = parse_cartdb(SAMPLE.as_bytes()).unwrap();
    import_cartdb(&conn, &db, Some(&recorder)).unwrap();

    assert_eq!(*recorder.phases.borrow(), vec!["Writing 3 games"]);
    assert_eq!(*recorder.games.borrow(), vec![(1, 3), (2, 3), (3, 3)]);
    assert!(*recorder.completed.borrow());
}

#[test]
fn failed_import_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nes.db");
    let conn = open_database(&path).unwrap();
    conn.execute_batch("DROP TABLE chip_pin; DROP TABLE chip;")
        .unwrap();

    let db = parse_cartdb(SAMPLE.as_bytes()).unwrap();
    assert!(import_cartdb(&conn, &db, None).is_err());

    let games: i64 = conn
        .query_row("SELECT COUNT(*) FROM game", [], |r| r.get(0))
        .unwrap();
    assert_eq!(games, 0);
}
