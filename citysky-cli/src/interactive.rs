use anyhow::Context;
use citysky_core::{Action, Session, ViewState};
use inquire::{InquireError, Select, Text};

use crate::render;

const SEARCH_AS_TYPED: &str = "Search for what I typed";
const TOGGLE_UNIT: &str = "Toggle °C / °F";
const NEW_SEARCH: &str = "New search";
const QUIT: &str = "Quit";

/// Prompt-driven search loop: query, pick a suggestion, view, repeat.
pub async fn run(session: &Session, initial: Option<String>) -> anyhow::Result<()> {
    let mut initial = initial;

    loop {
        let state = session.state();

        if state.weather().is_some() {
            print!("{}", render::weather_card(&state));
            let choice = prompt(move || {
                Select::new("Next:", vec![TOGGLE_UNIT, NEW_SEARCH, QUIT]).prompt()
            })
            .await?;

            match choice {
                Some(TOGGLE_UNIT) => {
                    session.send(Action::ToggleUnit).await?;
                }
                Some(NEW_SEARCH) => {
                    session.send(Action::NewSearch).await?;
                }
                _ => return Ok(()),
            }
            continue;
        }

        if let Some(error) = state.error() {
            eprintln!("{error}");
        }

        let query = match initial.take() {
            Some(query) => query,
            None => {
                let default = state.query().to_string();
                let answer = prompt(move || {
                    Text::new("City:").with_initial_value(&default).prompt()
                })
                .await?;
                match answer {
                    Some(answer) => answer,
                    None => return Ok(()),
                }
            }
        };

        session.send(Action::QueryChanged(query)).await?;
        let state = session.settle().await?;
        choose(session, &state).await?;
        session.settle().await?;
    }
}

/// Offer the suggestions for the settled query, then look up the chosen one.
async fn choose(session: &Session, state: &ViewState) -> anyhow::Result<()> {
    if state.suggestions().is_empty() {
        session.send(Action::Submit).await?;
        return Ok(());
    }

    let mut options = render::suggestion_labels(state.suggestions());
    options.push(SEARCH_AS_TYPED.to_string());
    let count = state.suggestions().len();

    let picked = prompt(move || Select::new("Did you mean:", options).raw_prompt()).await?;
    match picked {
        Some(option) if option.index < count => {
            session.send(Action::SelectSuggestion(option.index)).await?;
        }
        Some(_) => {
            session.send(Action::Submit).await?;
        }
        None => {
            // Leaving the list behaves like the input losing focus.
            session.send(Action::InputBlurred).await?;
        }
    }
    Ok(())
}

/// Run a blocking prompt off the async workers. `None` means the user backed out.
async fn prompt<T, F>(f: F) -> anyhow::Result<Option<T>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, InquireError> + Send + 'static,
{
    let answer = tokio::task::spawn_blocking(f).await.context("Prompt task failed")?;
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read input"),
    }
}
