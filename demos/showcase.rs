//! Example: screen scenarios
//!
//! Each scenario wires a small "screen" out of subjects and operators and
//! prints what its widgets would display. Run one by name, or all of them:
//!
//! ```text
//! cargo run --example showcase -- login
//! RUST_LOG=trace cargo run --example showcase
//! ```

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use rxstream::prelude::*;

const ACCOUNT_LEN: usize = 11;
const PASSWORD_MIN: usize = 6;

/// Scenario id, one line description, entry point.
const SCENARIOS: &[(&str, &str, fn())] = &[
  ("login", "login button enabled by account and password rules", login),
  ("subjects", "current value subject vs passthrough subject", subjects),
  ("arrays", "merge and zip of two arrays", arrays),
  ("table", "rows appended from a current value subject", table),
  ("taps", "throttled tap events from a target/action source", taps),
];

// ==================================================================================
// Login form
// ==================================================================================

fn login() {
  let mut account = BehaviorSubject::<String, Infallible>::new(String::new());
  let mut password = BehaviorSubject::<String, Infallible>::new(String::new());
  let mut bag = SubscriptionBag::new();

  account
    .clone()
    .combine_latest(password.clone())
    .map(|(a, p): (String, String)| a.chars().count() == ACCOUNT_LEN && p.chars().count() >= PASSWORD_MIN)
    .subscribe(|enabled| println!("  login button enabled: {enabled}"))
    .store_in(&mut bag);

  // text fields clip their input before publishing it
  let typed = [("account", "138001380001234"), ("password", "hunter"), ("password", "abc")];
  for (field, text) in typed {
    println!("  {field} <- {text:?}");
    match field {
      "account" => account.next(text.chars().take(ACCOUNT_LEN).collect()),
      _ => password.next(text.chars().take(PASSWORD_MIN * 2).collect()),
    }
  }
}

// ==================================================================================
// Current value vs passthrough
// ==================================================================================

fn subjects() {
  let mut current = BehaviorSubject::<&str, Infallible>::new("initial");
  let mut passthrough = Subject::<&str, Infallible>::new();

  current.next("before subscribe");
  passthrough.next("before subscribe");

  let _c = current.clone().subscribe(|v| println!("  current:     {v}"));
  let _p = passthrough.clone().subscribe(|v| println!("  passthrough: {v}"));

  current.next("after subscribe");
  passthrough.next("after subscribe");
  current.clone().complete();
  if let Err(e) = current.try_next("after complete") {
    println!("  current rejected a push: {e}");
  }
}

// ==================================================================================
// Arrays
// ==================================================================================

fn arrays() {
  let a = vec![1, 2, 3];
  let b = vec![4, 5, 6];

  observable::from_iter(a.clone())
    .merge(observable::from_iter(b.clone()))
    .filter(|v| *v > 2)
    .map(|v| format!("<{v}>"))
    .subscribe_all(|v| println!("  merge: {v}"), |_: Infallible| {}, || println!("  merge: done"));

  observable::from_iter(a)
    .zip(observable::from_iter(b))
    .subscribe_all(|(x, y)| println!("  zip: ({x}, {y})"), |_: Infallible| {}, || println!("  zip: done"));

  let contains = Rc::new(RefCell::new(None));
  let c = contains.clone();
  observable::from_iter(0..10)
    .contains(7)
    .subscribe(move |v| *c.borrow_mut() = Some(v));
  println!("  0..10 contains 7: {:?}", contains.borrow());
}

// ==================================================================================
// Table
// ==================================================================================

fn table() {
  let mut rows = BehaviorSubject::<Vec<String>, Infallible>::new(vec![]);
  let mut bag = SubscriptionBag::new();
  rows
    .clone()
    .map(|rows: Vec<String>| rows.len())
    .subscribe(|n| println!("  reload table, {n} rows"))
    .store_in(&mut bag);

  for i in 0..3 {
    let mut next = rows.value();
    next.push(format!("row {i}"));
    rows.next(next);
  }

  // tapping a row reads the current snapshot once
  let selected = 1;
  rows
    .clone()
    .first()
    .subscribe(move |rows: Vec<String>| match rows.get(selected) {
      Some(row) => println!("  detail for {row}"),
      None => println!("  no row {selected}"),
    });
}

// ==================================================================================
// Taps
// ==================================================================================

fn taps() {
  TestScheduler::init();
  let recognizer = TargetRegistry::<(i32, i32)>::new();
  let mut bag = SubscriptionBag::new();

  observable::from_target(recognizer.clone())
    .throttle_time(Duration::from_millis(500), ThrottleEdge::all(), TestScheduler)
    .subscribe(|(x, y)| println!("  {:>4}ms tap at ({x}, {y})", TestScheduler::now().as_millis()))
    .store_in(&mut bag);

  for (at, point) in [(0, (1, 1)), (100, (2, 2)), (300, (3, 3)), (900, (4, 4)), (1600, (5, 5))] {
    TestScheduler::advance_by(Duration::from_millis(at) - TestScheduler::now());
    recognizer.send_action(point);
  }
  TestScheduler::flush();

  bag.dispose();
  recognizer.send_action((6, 6));
  println!("  targets left after dispose: {}", recognizer.target_count());
}

fn main() {
  let _ = env_logger::try_init();

  let wanted = std::env::args().nth(1);
  let mut ran = false;
  for (id, about, run) in SCENARIOS {
    if wanted.as_deref().map_or(true, |w| w == *id) {
      println!("== {id}: {about}");
      run();
      ran = true;
    }
  }
  if !ran {
    let ids: Vec<_> = SCENARIOS.iter().map(|(id, ..)| *id).collect();
    eprintln!("unknown scenario, expected one of {}", ids.join(", "));
    std::process::exit(2);
  }
}
