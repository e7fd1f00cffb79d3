//! End-to-end tests of the CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ffm(save: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ffm").unwrap();
    cmd.arg("--save").arg(save).arg("--seed").arg("7");
    cmd
}

fn save_in(dir: &TempDir) -> PathBuf {
    dir.path().join("ff_manager_state_v1.json")
}

fn saved_json(save: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(save).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// new / roll / status
// ---------------------------------------------------------------------------

#[test]
fn new_creates_save_file() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save)
        .args(["new", "Ayla"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started"))
        .stdout(predicate::str::contains("Ayla"));

    let json = saved_json(&save);
    assert_eq!(json["version"], 1);
    assert_eq!(json["player"]["name"], "Ayla");
    assert_eq!(json["player"]["provisions"], 10);
    assert!(json["player"]["skill"]["initial"].is_null());
}

#[test]
fn roll_sets_stats_in_range() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save)
        .arg("roll")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Rolled initial stats: SKILL "));

    let json = saved_json(&save);
    let skill = json["player"]["skill"]["initial"].as_i64().unwrap();
    let stamina = json["player"]["stamina"]["initial"].as_i64().unwrap();
    let luck = json["player"]["luck"]["current"].as_i64().unwrap();
    assert!((7..=12).contains(&skill));
    assert!((14..=24).contains(&stamina));
    assert!((7..=12).contains(&luck));
}

#[test]
fn roll_unknown_stat_fails() {
    let dir = TempDir::new().unwrap();
    ffm(&save_in(&dir))
        .args(["roll", "charm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: roll"));
}

#[test]
fn status_shows_sheet_and_monsters() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).args(["new", "Ayla"]).assert().success();
    ffm(&save).arg("roll").assert().success();
    ffm(&save)
        .args(["do", "monster", "add", "Cave", "Troll", "9", "10"])
        .assert()
        .success();

    ffm(&save)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ayla"))
        .stdout(predicate::str::contains("SKILL"))
        .stdout(predicate::str::contains("Cave Troll"))
        .stdout(predicate::str::contains("10/10"))
        .stdout(predicate::str::contains("1 monsters"));
}

#[test]
fn status_before_roll_hints() {
    let dir = TempDir::new().unwrap();
    ffm(&save_in(&dir))
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stats not rolled yet"))
        .stdout(predicate::str::contains("No monsters yet."));
}

// ---------------------------------------------------------------------------
// rules
// ---------------------------------------------------------------------------

#[test]
fn luck_before_roll_fails_and_is_logged() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save)
        .arg("luck")
        .assert()
        .failure()
        .stderr(predicate::str::contains("roll stats first"));

    let json = saved_json(&save);
    let line = json["logs"]["luck"][0].as_str().unwrap();
    assert!(line.ends_with("Roll stats first."));
}

#[test]
fn luck_spends_one_point() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).arg("roll").assert().success();
    let before = saved_json(&save)["player"]["luck"]["current"]
        .as_i64()
        .unwrap();

    ffm(&save)
        .arg("luck")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Test Your Luck: rolled "));

    let after = saved_json(&save)["player"]["luck"]["current"]
        .as_i64()
        .unwrap();
    assert_eq!(after, before - 1);
}

#[test]
fn fight_without_monster_fails() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).arg("roll").assert().success();
    ffm(&save)
        .arg("fight")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active monster selected"));
}

#[test]
fn fight_round_is_logged() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).arg("roll").assert().success();
    ffm(&save)
        .args(["do", "monster", "add", "Orc", "6", "30"])
        .assert()
        .success();
    ffm(&save)
        .args(["fight", "--luck"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("wins:").or(predicate::str::contains("Tie: Player AS")),
        );

    let json = saved_json(&save);
    assert!(!json["logs"]["combat"].as_array().unwrap().is_empty());
}

#[test]
fn potion_is_single_use() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).arg("roll").assert().success();
    ffm(&save)
        .args(["do", "potion", "strength"])
        .assert()
        .success();
    ffm(&save)
        .args(["do", "drink"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Potion of Strength"));
    ffm(&save)
        .args(["do", "drink"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("potion already used"));
}

#[test]
fn adjust_accepts_negative_amounts() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save)
        .args(["do", "adjust", "gold", "+40"])
        .assert()
        .success();
    ffm(&save)
        .args(["do", "adjust", "gold", "-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gold: 25."));
}

// ---------------------------------------------------------------------------
// dice / log
// ---------------------------------------------------------------------------

#[test]
fn dice_default_is_two_d6() {
    let dir = TempDir::new().unwrap();
    ffm(&save_in(&dir))
        .arg("dice")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Rolled 2d6: "));
}

#[test]
fn dice_rejects_three_dice() {
    let dir = TempDir::new().unwrap();
    ffm(&save_in(&dir))
        .args(["dice", "3d6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 or 2 dice"));
}

#[test]
fn log_lists_dice_rolls() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).args(["dice", "d20"]).assert().success();
    ffm(&save)
        .args(["log", "dice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled 1d20: "));
    ffm(&save)
        .args(["log", "combat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No combat rounds yet."));
}

// ---------------------------------------------------------------------------
// export / persistence
// ---------------------------------------------------------------------------

#[test]
fn export_to_stdout_is_json() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save).args(["new", "Ayla"]).assert().success();
    let output = ffm(&save).arg("export").output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["player"]["name"], "Ayla");
}

#[test]
fn export_to_file() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    let out = dir.path().join("backup.json");
    ffm(&save).arg("roll").assert().success();
    ffm(&save)
        .arg("export")
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));
    assert_eq!(saved_json(&out), saved_json(&save));
}

#[test]
fn corrupt_save_starts_fresh() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    fs::write(&save, "this is not json").unwrap();
    ffm(&save)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stats not rolled yet"));
}

#[test]
fn play_reads_commands_from_stdin() {
    let dir = TempDir::new().unwrap();
    let save = save_in(&dir);
    ffm(&save)
        .arg("play")
        .write_stdin("new Bren\nroll\nstatus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("New adventure started for Bren."))
        .stdout(predicate::str::contains("Adventurer: Bren"))
        .stdout(predicate::str::contains("Farewell, adventurer."));
    assert_eq!(saved_json(&save)["player"]["name"], "Bren");
}

#[test]
fn unknown_play_command_is_reported() {
    let dir = TempDir::new().unwrap();
    ffm(&save_in(&dir))
        .arg("play")
        .write_stdin("dance\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'dance'"));
}
