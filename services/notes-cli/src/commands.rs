//! Subcommand execution
//!
//! Every command prints its result as pretty JSON on stdout, except
//! `notes download` which writes the raw file.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::io::Write;

use common::Secret;
use notes_client::models::{
    KeywordSearchQuery, NoteCreate, NoteListParams, NoteUpdate, QaSessionCreate, QaSessionUpdate,
    SearchQuery,
};
use notes_client::{Session, Upload};

use crate::cli::{AdminCommand, Command, NotesCommand, QaCommand, SearchCommand};

pub async fn run(session: &Session, command: Command) -> Result<()> {
    let client = session.client();
    match command {
        Command::Login { email, password } => {
            let user = session
                .login(&email, &Secret::new(password))
                .await
                .context("login failed")?;
            print_json(&user)
        }
        Command::Logout => {
            session.logout().await;
            print_json(&serde_json::json!({ "message": "Logged out" }))
        }
        Command::Register {
            email,
            password,
            full_name,
        } => {
            let registered = session
                .register(&email, &Secret::new(password), full_name.as_deref())
                .await
                .context("registration failed")?;
            print_json(&registered)
        }
        Command::Whoami => match session.load_user().await? {
            Some(user) => print_json(&user),
            None => bail!("not logged in; run `notes login <email>`"),
        },
        Command::VerifyEmail { token } => print_json(&client.auth().verify_email(&token).await?),
        Command::ResendVerification { email } => {
            print_json(&client.auth().resend_verification(&email).await?)
        }
        Command::ForgotPassword { email } => {
            print_json(&client.auth().forgot_password(&email).await?)
        }
        Command::ResetPassword {
            token,
            new_password,
        } => print_json(
            &client
                .auth()
                .reset_password(&token, &Secret::new(new_password))
                .await?,
        ),
        Command::ChangePassword {
            current_password,
            new_password,
        } => print_json(
            &client
                .auth()
                .change_password(&Secret::new(current_password), &Secret::new(new_password))
                .await?,
        ),
        Command::Notes(cmd) => run_notes(session, cmd).await,
        Command::Search(cmd) => run_search(session, cmd).await,
        Command::Qa(cmd) => run_qa(session, cmd).await,
        Command::Admin(cmd) => run_admin(session, cmd).await,
    }
}

async fn run_notes(session: &Session, command: NotesCommand) -> Result<()> {
    let notes = session.client().notes();
    match command {
        NotesCommand::List {
            page,
            search,
            pinned,
            archived,
            sort_by,
        } => {
            let params = NoteListParams {
                page: page.into(),
                search,
                is_pinned: pinned,
                is_archived: archived,
                note_ids: None,
                sort_by,
            };
            print_json(&notes.list(&params).await?)
        }
        NotesCommand::Get { id } => print_json(&notes.get(&id).await?),
        NotesCommand::Create {
            title,
            content,
            tags,
        } => {
            let note = NoteCreate {
                title,
                content,
                tags: (!tags.is_empty()).then_some(tags),
            };
            print_json(&notes.create(&note).await?)
        }
        NotesCommand::Update {
            id,
            title,
            content,
            tags,
        } => {
            let update = NoteUpdate {
                title,
                content,
                tags,
            };
            print_json(&notes.update(&id, &update).await?)
        }
        NotesCommand::Delete { id } => print_json(&notes.delete(&id).await?),
        NotesCommand::Restore { id } => print_json(&notes.restore(&id).await?),
        NotesCommand::Pin { id } => print_json(&notes.toggle_pin(&id).await?),
        NotesCommand::Archive { id } => print_json(&notes.toggle_archive(&id).await?),
        NotesCommand::Trash { page } => print_json(&notes.trash(page.into()).await?),
        NotesCommand::Purge { id } => print_json(&notes.permanently_delete(&id).await?),
        NotesCommand::Summarize { id } => print_json(&notes.summarize(&id).await?),
        NotesCommand::SuggestTags { id, content } => {
            print_json(&notes.suggest_tags(&id, content.as_deref()).await?)
        }
        NotesCommand::Upload {
            file,
            title,
            tags,
            content_type,
        } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .with_context(|| format!("not a file path: {}", file.display()))?;
            let title = title.unwrap_or_else(|| file_name.clone());
            let upload = Upload {
                file_name,
                content_type,
                bytes: bytes::Bytes::from(bytes),
            };
            print_json(&notes.upload(&title, upload, &tags).await?)
        }
        NotesCommand::Download { id, output } => {
            let bytes = notes.download(&id).await?;
            match output {
                Some(path) => tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("failed to write {}", path.display())),
                None => std::io::stdout()
                    .write_all(&bytes)
                    .context("failed to write to stdout"),
            }
        }
    }
}

async fn run_search(session: &Session, command: SearchCommand) -> Result<()> {
    let search = session.client().search();
    match command {
        SearchCommand::Semantic { query, top_k } => {
            print_json(&search.semantic(&SearchQuery { query, top_k }).await?)
        }
        SearchCommand::Keyword { keywords, top_k } => {
            print_json(&search.keyword(&KeywordSearchQuery { keywords, top_k }).await?)
        }
        SearchCommand::Embed { id } => print_json(&search.create_embeddings(&id).await?),
        SearchCommand::Stats { id } => print_json(&search.embedding_stats(&id).await?),
        SearchCommand::Unembed { id } => print_json(&search.delete_embeddings(&id).await?),
        SearchCommand::Rebuild => print_json(&search.rebuild_all().await?),
    }
}

async fn run_qa(session: &Session, command: QaCommand) -> Result<()> {
    let qa = session.client().qa();
    match command {
        QaCommand::Create { note_ids, title } => {
            print_json(&qa.create_session(&QaSessionCreate { note_ids, title }).await?)
        }
        QaCommand::List { page } => print_json(&qa.list_sessions(page.into()).await?),
        QaCommand::Show { id } => print_json(&qa.get_session(&id).await?),
        QaCommand::Rename { id, title } => {
            let update = QaSessionUpdate {
                title: Some(title),
                note_ids: None,
            };
            print_json(&qa.update_session(&id, &update).await?)
        }
        QaCommand::Delete { id } => print_json(&qa.delete_session(&id).await?),
        QaCommand::Ask { id, question } => print_json(&qa.send_message(&id, &question).await?),
        QaCommand::Summary { id } => print_json(&qa.session_summary(&id).await?),
    }
}

async fn run_admin(session: &Session, command: AdminCommand) -> Result<()> {
    let admin = session.client().admin();
    match command {
        AdminCommand::Stats => print_json(&admin.system_stats().await?),
        AdminCommand::Users { page } => print_json(&admin.list_users(page.into()).await?),
        AdminCommand::SetRole { user_id, role } => {
            print_json(&admin.update_user_role(&user_id, role.into()).await?)
        }
        AdminCommand::SetStatus { user_id, status } => {
            print_json(&admin.update_user_status(&user_id, status.into()).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
