//! Line-oriented terminal session that drives the form and table flows.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::AnswersApi;
use crate::errors::AppError;
use crate::flows::{FormFlow, Route, TableFlow};
use crate::hooks::{load_answers, ResetAnswers, UpdateAnswers};
use crate::store::AnswersStore;

const HELP: &str = "\
commands:
  name <text>    set the name field
  mail <text>    set the email field
  age <text>     set the age field
  toggle <id>    flip an interest checkbox
  submit         submit the form
  edit           open the form from the table
  delete         reset the stored answers from the table
  go <path>      open /form or /table
  show           redraw the current view
  help           show this text
  quit           leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Mail(String),
    Age(String),
    Toggle(String),
    Submit,
    Edit,
    Delete,
    Go(Route),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "name" => Command::Name(rest.to_string()),
            "mail" => Command::Mail(rest.to_string()),
            "age" => Command::Age(rest.to_string()),
            "toggle" if !rest.is_empty() => Command::Toggle(rest.to_string()),
            "toggle" => {
                return Err(AppError::BadRequest(
                    "toggle needs an interest id".to_string(),
                ))
            }
            "submit" => Command::Submit,
            "edit" => Command::Edit,
            "delete" => Command::Delete,
            "go" => match Route::from_path(rest) {
                Some(route) => Command::Go(route),
                None => return Err(AppError::NotFound(format!("No route at {:?}", rest))),
            },
            "show" | "" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(AppError::BadRequest(format!("Unknown command: {}", other))),
        };
        Ok(command)
    }
}

/// Routes between the two flows for one user.
pub struct Console<A> {
    api: Arc<A>,
    store: Arc<AnswersStore>,
    update: UpdateAnswers<A>,
    reset: ResetAnswers<A>,
    redirect_delay: Duration,
    route: Route,
    form: Option<FormFlow>,
    table: TableFlow,
}

impl<A: AnswersApi> Console<A> {
    pub fn new(api: Arc<A>, store: Arc<AnswersStore>, redirect_delay: Duration) -> Self {
        Self {
            update: UpdateAnswers::new(api.clone(), store.clone()),
            reset: ResetAnswers::new(api.clone(), store.clone()),
            table: TableFlow::mount(store.clone()),
            api,
            store,
            redirect_delay,
            route: Route::Table,
            form: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Load the answers and start on the table.
    pub async fn start(&mut self) -> Result<String, AppError> {
        load_answers(self.api.as_ref(), &self.store).await?;
        self.navigate(Route::Table);
        Ok(self.render())
    }

    /// Apply one command and write what it shows. Returns `false` once the session ends.
    ///
    /// Intermediate views, such as the redirecting form or the table while a delete is
    /// pending, are written before the step that ends them.
    pub async fn execute<W>(&mut self, command: Command, output: &mut W) -> Result<bool, AppError>
    where
        W: AsyncWrite + Unpin,
    {
        let outcome = match command {
            Command::Quit => return Ok(false),
            Command::Help => {
                write_block(output, HELP).await?;
                return Ok(true);
            }
            Command::Show => Ok(()),
            Command::Go(route) => {
                self.navigate(route);
                Ok(())
            }
            Command::Edit => match self.on_table() {
                Ok(()) => {
                    let route = self.table.edit();
                    self.navigate(route);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Delete => match self.on_table() {
                Ok(()) => {
                    self.table.begin_delete();
                    write_block(output, &self.render()).await?;
                    self.table.delete(&self.reset).await
                }
                Err(e) => Err(e),
            },
            Command::Submit => match self.form.as_mut() {
                Some(form) => match form.submit(&self.update).await {
                    Ok(()) => {
                        write_block(output, &self.render()).await?;
                        let route = match self.form.as_ref() {
                            Some(form) => form.redirect().await,
                            None => Route::Table,
                        };
                        self.navigate(route);
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
                None => Err(not_on_form()),
            },
            Command::Name(value) => self.with_form(|form| form.set_name(value)),
            Command::Mail(value) => self.with_form(|form| form.set_mail(value)),
            Command::Age(value) => self.with_form(|form| form.set_age(value)),
            Command::Toggle(id) => match self.form.as_mut() {
                Some(form) => {
                    if form.toggle_interest(&id) {
                        Ok(())
                    } else {
                        Err(AppError::NotFound(format!("No interest with id {}", id)))
                    }
                }
                None => Err(not_on_form()),
            },
        };

        let view = self.render();
        let text = match outcome {
            Ok(()) => view,
            Err(e) => format!("error: {}\n{}", e.message(), view),
        };
        write_block(output, &text).await?;
        Ok(true)
    }

    /// Read commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let intro = match self.start().await {
            Ok(view) => view,
            Err(e) => format!("error: {}\n{}", e.message(), self.render()),
        };
        write_block(&mut output, &intro).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match Command::parse(&line) {
                Ok(command) => {
                    if !self.execute(command, &mut output).await? {
                        break;
                    }
                }
                Err(e) => write_block(&mut output, &format!("error: {}", e.message())).await?,
            }
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        match (self.route, &self.form) {
            (Route::Form, Some(form)) => format!("{}\n{}", self.route, form.render()),
            _ => format!("{}\n{}", Route::Table, self.table.render()),
        }
    }

    fn navigate(&mut self, route: Route) {
        tracing::debug!(%route, "Navigating");
        self.route = route;
        match route {
            Route::Form => self.form = Some(FormFlow::mount(&self.store, self.redirect_delay)),
            Route::Table => {
                self.form = None;
                self.table.refresh();
            }
        }
    }

    fn with_form(&mut self, edit: impl FnOnce(&mut FormFlow)) -> Result<(), AppError> {
        match self.form.as_mut() {
            Some(form) => {
                edit(form);
                Ok(())
            }
            None => Err(not_on_form()),
        }
    }

    fn on_table(&self) -> Result<(), AppError> {
        if self.route == Route::Table {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Only available on the table ({})",
                Route::Table
            )))
        }
    }
}

fn not_on_form() -> AppError {
    AppError::BadRequest(format!("Open the form first ({})", Route::Form))
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AppError> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::flows::{LOADER_ALT, NO_INFO_MSG, REDIRECTING_LABEL};
    use crate::converters::domain_to_api;
    use crate::hooks::tests::{jane, FakeApi};
    use crate::models::AnswerSet;

    fn api_holding(answers: &AnswerSet, delay: Duration) -> Arc<FakeApi> {
        let api = FakeApi {
            delay,
            ..FakeApi::default()
        };
        *api.stored.lock().unwrap() = Some(domain_to_api(answers).unwrap());
        Arc::new(api)
    }

    async fn session(console: &mut Console<FakeApi>, script: &str) -> String {
        let mut output = Vec::new();
        console.run(script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("name  Jane Doe ").unwrap(),
            Command::Name("Jane Doe".to_string())
        );
        assert_eq!(Command::parse("age").unwrap(), Command::Age(String::new()));
        assert_eq!(
            Command::parse("toggle sports").unwrap(),
            Command::Toggle("sports".to_string())
        );
        assert_eq!(Command::parse("go /form").unwrap(), Command::Go(Route::Form));
        assert_eq!(Command::parse("").unwrap(), Command::Show);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert!(Command::parse("toggle").is_err());
        assert!(Command::parse("go /admin").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[tokio::test]
    async fn test_submit_shows_redirecting_before_table() {
        let api = Arc::new(FakeApi::default());
        let store = Arc::new(AnswersStore::default());
        let mut console = Console::new(api, store, Duration::from_millis(30));

        let output = session(
            &mut console,
            "edit\nname Jane Doe\nmail jane@x.com\nage 30\ntoggle sports\nsubmit\nquit\n",
        )
        .await;

        let redirecting = output.find(REDIRECTING_LABEL).unwrap();
        let row = output.find("Jane Doe | jane@x.com | 30 | Sports").unwrap();
        assert!(redirecting < row);
        assert_eq!(console.route(), Route::Table);
    }

    #[tokio::test]
    async fn test_delete_shows_loader_while_pending() {
        let api = api_holding(&jane(), Duration::from_millis(20));
        let store = Arc::new(AnswersStore::default());
        let mut console = Console::new(api.clone(), store.clone(), Duration::ZERO);

        let output = session(&mut console, "delete\nquit\n").await;

        let loading = output.find(LOADER_ALT).unwrap();
        let placeholder = output.rfind(NO_INFO_MSG).unwrap();
        assert!(loading < placeholder);
        assert!(output.trim_end().ends_with(NO_INFO_MSG));
        assert!(store.get_answers().is_blank());
    }

    #[tokio::test]
    async fn test_table_actions_refused_on_form() {
        let api = api_holding(&jane(), Duration::ZERO);
        let store = Arc::new(AnswersStore::default());
        let mut console = Console::new(api.clone(), store.clone(), Duration::ZERO);

        let output = session(
            &mut console,
            "edit\nname Jane Maria Doe\nedit\ndelete\nquit\n",
        )
        .await;

        assert_eq!(output.matches("Only available on the table").count(), 2);
        assert_eq!(output.matches("Name: Jane Maria Doe").count(), 3);
        assert_eq!(console.route(), Route::Form);
        assert_eq!(*api.calls.lock().unwrap(), vec!["fetch"]);
        assert_eq!(store.get_answers(), jane());
    }

    #[tokio::test]
    async fn test_go_leaves_form_without_saving() {
        let api = api_holding(&jane(), Duration::ZERO);
        let store = Arc::new(AnswersStore::default());
        let mut console = Console::new(api, store.clone(), Duration::ZERO);

        session(&mut console, "edit\nname Someone Else\ngo /table\nquit\n").await;
        assert_eq!(console.route(), Route::Table);
        assert_eq!(store.get_answers(), jane());
    }
}
