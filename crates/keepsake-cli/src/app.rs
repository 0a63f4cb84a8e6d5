//! Command dispatcher.
//!
//! [`App`] owns the [`Session`] for one invocation and runs a single
//! [`Command`] against it, writing human-readable output to `out`.

use std::{io::Write, sync::Arc};

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, Local, Utc};
use keepsake_core::{
  DurableStorage,
  book::{CommentBook, SaveOutcome, SyncStatus},
  calendar::{Calendar, NewEvent},
  candle::Candle,
  comment::{AnimeId, CommentTable, Person},
  elapsed::{Elapsed, TimerView},
  gacha::{self, Draw, Gacha},
  quiz::{Quiz, QuizBank},
  session::Session,
  todo::TodoList,
  visits::Page,
};
use rand_core::RngCore;
use strum::IntoEnumIterator as _;

use crate::{
  CalendarAction,
  CandleAction,
  Command,
  CommentsAction,
  GachaAction,
  LangAction,
  QuizAction,
  TodoAction,
};

pub struct App<B, T> {
  session: Session<B>,
  table:   Arc<T>,
  start:   DateTime<Utc>,
}

fn now_label() -> String { Local::now().format("%Y-%m-%d %H:%M:%S").to_string() }

fn print_elapsed(out: &mut impl Write, e: &Elapsed) -> Result<()> {
  writeln!(
    out,
    "{} weeks | {} days | {} hours | {} minutes | {} seconds",
    e.weeks, e.days, e.hours, e.minutes, e.seconds
  )?;
  Ok(())
}

impl<B, T> App<B, T>
where
  B: DurableStorage,
  T: CommentTable,
{
  pub fn new(store: keepsake_core::LocalStore<B>, table: Arc<T>, start: DateTime<Utc>) -> Self {
    Self { session: Session::start(store, now_label()), table, start }
  }

  fn page_for(command: &Command) -> Option<Page> {
    match command {
      Command::Timer { .. } => Some(Page::Home),
      Command::Todo { .. } => Some(Page::Todo),
      Command::Calendar { .. } => Some(Page::Calendar),
      Command::Candle { .. } => Some(Page::Birthday),
      Command::Gacha { .. } => Some(Page::Gacha),
      Command::Quiz { .. } => Some(Page::Quiz),
      Command::Comments { .. } => Some(Page::Anime),
      Command::Open { page } => Some(*page),
      Command::Visits | Command::Lang { .. } | Command::Clear { .. } => None,
    }
  }

  pub async fn run(
    &mut self,
    command: Command,
    rng: &mut impl RngCore,
    out: &mut impl Write,
  ) -> Result<()> {
    if let Some(page) = Self::page_for(&command) {
      self.session.navigate(page);
    }
    let store = self.session.store().clone();

    match command {
      Command::Timer { watch } => {
        if !watch {
          return print_elapsed(out, &Elapsed::between(self.start, Utc::now()));
        }
        let mut view = TimerView::mount(self.start);
        print_elapsed(out, &view.current())?;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
          tokio::select! {
            tick = view.next() => match tick {
              Some(e) => print_elapsed(out, &e)?,
              None => break,
            },
            _ = &mut ctrl_c => break,
          }
        }
        view.unmount();
      }

      Command::Visits => {
        let previous = self.session.previous_visit();
        if previous.is_empty() {
          writeln!(out, "first visit")?;
        } else {
          writeln!(out, "last visit: {previous}")?;
        }
        let visits = self.session.visits();
        for page in Page::iter().filter(|p| p.is_tracked()) {
          let mark = if visits.contains(page) { "x" } else { " " };
          writeln!(out, "[{mark}] {page}")?;
        }
        writeln!(out, "{} pages visited", visits.total())?;
      }

      Command::Lang { action } => {
        if let Some(LangAction::Set { language }) = action {
          self.session.set_language(language);
        }
        writeln!(out, "{}", self.session.language())?;
      }

      Command::Todo { action } => {
        let mut todo = TodoList::open(store);
        match action {
          TodoAction::List => {
            for (i, done) in todo.states().iter().take(todo.checkable()).enumerate() {
              writeln!(out, "{i:>3} [{}]", if *done { "x" } else { " " })?;
            }
          }
          TodoAction::Toggle { index } => match todo.toggle(index) {
            Some(done) => writeln!(out, "{index}: {}", if done { "done" } else { "not done" })?,
            None => writeln!(out, "no checkable item at index {index}")?,
          },
          TodoAction::Reset => todo.reset(),
        }
        writeln!(out, "{}/{} completed", todo.completed(), todo.checkable())?;
      }

      Command::Calendar { action } => {
        let mut calendar = Calendar::open(store, self.session.language());
        match action {
          CalendarAction::List => {
            for event in calendar.sorted() {
              let id = event.id.map(|id| format!(" #{id}")).unwrap_or_default();
              writeln!(out, "{}  {}{id}", event.date, event.title)?;
              if !event.description.is_empty() {
                writeln!(out, "            {}", event.description)?;
              }
            }
          }
          CalendarAction::Add { date, title, description } => {
            let input = NewEvent { date, title, description };
            match calendar.add(input, Utc::now().timestamp_millis()) {
              Some(event) => writeln!(out, "added #{}", event.id.unwrap_or_default())?,
              None => writeln!(out, "nothing added: date and title are required")?,
            }
          }
          CalendarAction::Delete { id } => {
            if !calendar.delete(id) {
              bail!("no user-added event #{id}");
            }
            writeln!(out, "deleted #{id}")?;
          }
        }
      }

      Command::Candle { action } => {
        let mut candle = Candle::open(store);
        match action {
          CandleAction::Status => {}
          CandleAction::Blow => {
            if !candle.blow() {
              writeln!(out, "already blown out")?;
            }
          }
          CandleAction::Reset => candle.reset(),
        }
        writeln!(out, "{}", if candle.is_blown() { "blown out" } else { "lit" })?;
      }

      Command::Gacha { action } => {
        let mut gacha = Gacha::open(store);
        match action {
          GachaAction::Spin => {
            let (food, draw) = gacha.spin(rng);
            let tag = match draw {
              Draw::New => "new",
              Draw::Duplicate => "duplicate",
            };
            writeln!(out, "{} ({}) {tag}", food.id, food.rarity)?;
          }
          GachaAction::List => {
            for id in gacha.collected() {
              let rarity = gacha::find(id).map(|f| f.rarity.to_string()).unwrap_or_default();
              writeln!(out, "{id} {rarity}")?;
            }
          }
          GachaAction::Reset => gacha.reset(),
        }
        let (have, total) = gacha.progress();
        writeln!(out, "{have}/{total} collected")?;
      }

      Command::Quiz { action } => match action {
        QuizAction::Draw { category, questions } => {
          let raw = std::fs::read_to_string(&questions)
            .with_context(|| format!("reading {}; fix the file and retry", questions.display()))?;
          let bank = QuizBank::from_json(&raw, self.session.language())
            .context("loading quiz questions; fix the file and retry")?;
          let quiz = Quiz::open(store, bank);
          match quiz.draw(category, rng) {
            Some(q) => {
              writeln!(out, "#{} {}", q.id, q.question)?;
              for (key, option) in &q.options {
                writeln!(out, "  {key}) {option}")?;
              }
            }
            None => writeln!(out, "every {category} question has been answered")?,
          }
        }
        QuizAction::Answer { id } => {
          let mut quiz = Quiz::open(store, QuizBank::default());
          if !quiz.answer(&id) {
            writeln!(out, "#{id} was already answered")?;
          }
          writeln!(out, "{} answered", quiz.answered().len())?;
        }
      },

      Command::Comments { action } => {
        let mut book = CommentBook::new(self.table.clone(), store);
        match action {
          CommentsAction::List => {
            book.load_all().await;
            if let SyncStatus::Failed(msg) = book.status() {
              writeln!(out, "could not reach the server ({msg}); showing the local copy")?;
            }
            for anime in AnimeId::iter() {
              for person in [Person::Seiki, Person::Ryoma] {
                let text = book.comment(anime, person);
                if !text.is_empty() {
                  writeln!(out, "{anime} {person}: {text}")?;
                }
              }
            }
          }
          CommentsAction::Save { anime, person, text } => {
            match book.save_comment(anime, person, &text).await {
              SaveOutcome::Saved => writeln!(out, "saved")?,
              SaveOutcome::Rejected => writeln!(out, "nothing saved: comment is empty")?,
              SaveOutcome::Failed => {
                let msg = match book.status() {
                  SyncStatus::Failed(msg) => msg.clone(),
                  _ => String::new(),
                };
                bail!("saving failed, try again: {msg}");
              }
            }
          }
        }
      }

      Command::Open { page } => {
        writeln!(out, "opened {page}")?;
      }

      Command::Clear { yes } => {
        if !yes {
          bail!("this removes every stored value; pass --yes to confirm");
        }
        let outcome = self.session.clear_all();
        writeln!(out, "cleared ({outcome:?})")?;
      }
    }
    Ok(())
  }
}
