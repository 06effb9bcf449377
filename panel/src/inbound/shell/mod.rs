//! Line-oriented terminal front end.
//!
//! The shell reads one command per line and prints plain text. Directory
//! calls run as spawned tasks on the current runtime and report back over a
//! channel, so new commands are accepted while earlier calls are in flight.
//! When input ends every call still in flight is awaited and applied before
//! [`Shell::run`] returns.

mod command;
mod render;
mod router;

pub use command::{EditField, ShellCommand, ShellLine};
pub use render::{LOGIN_PROMPT, render_edit, render_status, render_users};
pub use router::Router;

use std::io::{self, Write};
use std::sync::Arc;

use clap::error::ErrorKind;
use mockable::Clock;
use pagination::PageNumber;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::domain::ports::{SessionStore, UserDirectory};
use crate::domain::{
    Outcome, Pending, Route, Session, SessionGuard, UserId, UserRecord, UsersViewModel,
};

/// Where the shell starts and how long fresh sessions last.
#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    /// Route shown first.
    pub start_route: Route,
    /// Page loaded the first time the users route is shown.
    pub start_page: PageNumber,
    /// Lifetime of sessions created by `login` without `--ttl`.
    pub session_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive shell over the users view.
pub struct Shell<D: ?Sized, S: ?Sized> {
    state: ShellState<D, S>,
    outcomes: UnboundedReceiver<Outcome>,
}

struct ShellState<D: ?Sized, S: ?Sized> {
    directory: Arc<D>,
    guard: SessionGuard<S, Router>,
    router: Arc<Router>,
    view: UsersViewModel<D, S, Router>,
    start_page: PageNumber,
    session_ttl_secs: u64,
    shown: Option<Route>,
    sender: UnboundedSender<Outcome>,
    in_flight: usize,
}

impl<D, S> Shell<D, S>
where
    D: UserDirectory + ?Sized + 'static,
    S: SessionStore + ?Sized,
{
    /// Wire a shell over `directory` and `store`.
    pub fn new(
        directory: Arc<D>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        options: ShellOptions,
    ) -> Self {
        let router = Arc::new(Router::new(options.start_route));
        let guard = SessionGuard::new(store, Arc::clone(&router), clock);
        let view = UsersViewModel::starting_at(
            Arc::clone(&directory),
            guard.clone(),
            options.start_page,
        );
        let (sender, outcomes) = mpsc::unbounded_channel();
        Self {
            state: ShellState {
                directory,
                guard,
                router,
                view,
                start_page: options.start_page,
                session_ttl_secs: options.session_ttl_secs,
                shown: None,
                sender,
                in_flight: 0,
            },
            outcomes,
        }
    }

    /// Route currently active.
    pub fn route(&self) -> Route {
        self.state.router.current()
    }

    /// Read commands from `input` until `quit` or end of input, writing the
    /// transcript to `out`. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns read errors from `input` and write errors from `out`.
    pub async fn run<R, W>(self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let Self {
            mut state,
            mut outcomes,
        } = self;
        let mut lines = input.lines();
        state.sync_route(out)?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if state.handle_line(&line, out)? == Flow::Quit {
                        break;
                    }
                }
                Some(outcome) = outcomes.recv(), if state.in_flight > 0 => {
                    state.apply(outcome, out)?;
                }
            }
            out.flush()?;
        }

        while state.in_flight > 0 {
            let Some(outcome) = outcomes.recv().await else {
                break;
            };
            state.apply(outcome, out)?;
        }
        out.flush()
    }
}

impl<D, S> ShellState<D, S>
where
    D: UserDirectory + ?Sized + 'static,
    S: SessionStore + ?Sized,
{
    fn handle_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<Flow> {
        let Some(name) = line.split_whitespace().next() else {
            return Ok(Flow::Continue);
        };
        let command = match ShellLine::parse_line(line) {
            Ok(parsed) => parsed.command,
            Err(error) => {
                if !matches!(
                    error.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) {
                    debug!(line, "unparseable shell command");
                }
                write!(out, "{}", error.render())?;
                return Ok(Flow::Continue);
            }
        };

        let route = self.router.current();
        if !command.available_on(route) {
            writeln!(out, "`{name}` is not available on {route}")?;
            return Ok(Flow::Continue);
        }

        let flow = self.handle(command, out)?;
        self.sync_route(out)?;
        Ok(flow)
    }

    fn handle(&mut self, command: ShellCommand, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            ShellCommand::Show => {
                render_status(out, self.view.status())?;
                render_users(out, &self.view)?;
            }
            ShellCommand::Next => {
                let pending = self.view.next_page();
                self.spawn_opt(pending);
            }
            ShellCommand::Prev => {
                if self.view.page() == PageNumber::FIRST {
                    writeln!(out, "Already on the first page.")?;
                } else {
                    let pending = self.view.previous_page();
                    self.spawn_opt(pending);
                }
            }
            ShellCommand::Page { number } => {
                if number == self.view.page() {
                    writeln!(out, "Already on page {number}.")?;
                } else {
                    let pending = self.view.set_page(number);
                    self.spawn_opt(pending);
                }
            }
            ShellCommand::Search { term } => {
                self.view.set_search_term(term.join(" "));
                render_users(out, &self.view)?;
            }
            ShellCommand::Edit { id } => self.begin_edit(id, out)?,
            ShellCommand::Set { field, value } => match self.view.edit_fields_mut() {
                Some(fields) => {
                    field.assign(fields, value.join(" "));
                    render_edit(out, self.view.edit_buffer())?;
                }
                None => writeln!(out, "No edit in progress.")?,
            },
            ShellCommand::Save => match self.view.save_edit() {
                Some(pending) => self.spawn(pending),
                None => writeln!(out, "No edit in progress.")?,
            },
            ShellCommand::Delete { id } => {
                let pending = self.view.delete_user(id);
                self.spawn(pending);
            }
            ShellCommand::Logout => self.view.logout(),
            ShellCommand::Login { token, ttl } => self.login(token, ttl, out)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn begin_edit(&mut self, id: UserId, out: &mut impl Write) -> io::Result<()> {
        match self.view.record(id).map(UserRecord::editable_fields) {
            Some(fields) => {
                self.view.begin_edit(id, fields);
                render_edit(out, self.view.edit_buffer())
            }
            None => writeln!(out, "No user #{id} on this page."),
        }
    }

    fn login(&mut self, token: String, ttl: Option<u64>, out: &mut impl Write) -> io::Result<()> {
        let ttl = ttl.unwrap_or(self.session_ttl_secs);
        let expires_at = self.guard.now().saturating_add_secs(ttl);
        let session = match Session::new(token, Some(expires_at)) {
            Ok(session) => session,
            Err(error) => return writeln!(out, "Login failed: {error}"),
        };
        if let Err(error) = self.guard.sign_in(&session) {
            warn!(%error, "failed to store session");
            writeln!(out, "Login failed: could not store the session.")?;
        }
        Ok(())
    }

    /// Show whatever view the router now points at, entering it if it
    /// changed. Entering the users view may bounce straight back to login.
    fn sync_route(&mut self, out: &mut impl Write) -> io::Result<()> {
        loop {
            let route = self.router.current();
            if self.shown == Some(route) {
                return Ok(());
            }
            self.shown = Some(route);
            match route {
                Route::Login => writeln!(out, "{LOGIN_PROMPT}")?,
                Route::Users => {
                    let page = std::mem::replace(&mut self.start_page, PageNumber::FIRST);
                    self.view = UsersViewModel::starting_at(
                        Arc::clone(&self.directory),
                        self.guard.clone(),
                        page,
                    );
                    if let Some(pending) = self.view.enter() {
                        writeln!(out, "Loading page {page}...")?;
                        self.spawn(pending);
                    }
                }
            }
        }
    }

    fn apply(&mut self, outcome: Outcome, out: &mut impl Write) -> io::Result<()> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let announce = !matches!(outcome, Outcome::Fetched { result: Ok(_), .. });
        self.view.apply(outcome);
        if self.router.current() != Route::Users {
            return Ok(());
        }
        if announce {
            render_status(out, self.view.status())?;
        }
        render_users(out, &self.view)
    }

    fn spawn_opt(&mut self, pending: Option<Pending>) {
        if let Some(pending) = pending {
            self.spawn(pending);
        }
    }

    fn spawn(&mut self, pending: Pending) {
        let sender = self.sender.clone();
        debug!(call = %pending.kind(), "directory call issued");
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = pending.await;
            if sender.send(outcome).is_err() {
                debug!("shell closed before the directory call finished");
            }
        });
    }
}
