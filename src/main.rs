use std::io::stdout;

use bookpane::app::App;
use bookpane::args::{self, Command, FavoritesCommand, Options};
use bookpane::chapter::parse;
use bookpane::config::Config;
use bookpane::favorites::{self, FavoritesStore, JsonFileStore};
use bookpane::library::load_book;
use bookpane::logging;
use bookpane::render::HtmlRenderer;
use bookpane::search::{SearchView, search};
use bookpane::session::{MAX_FONT_SIZE, MIN_FONT_SIZE, Session};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

fn main() -> Result<()> {
    color_eyre::install()?;
    let options = Options::parse();
    let config = Config::resolve(
        options.library.as_deref(),
        options.data_dir.as_deref(),
        options.log_file.as_deref(),
    )?;

    match &options.command {
        Command::Read(_) => logging::init_file(&config.log_file)?,
        _ => logging::init_stderr()?,
    }
    tracing::debug!(?config, "resolved configuration");

    let store = JsonFileStore::in_dir(&config.data_dir);

    match options.command {
        Command::Read(read) => {
            let source = config.library.source()?;
            let mut app = App::new(
                Session::new(args::search_mode(read.literal)),
                source,
                Box::new(store),
            );
            app.open(read.id.as_deref());

            let terminal = ratatui::init();
            execute!(stdout(), EnableMouseCapture)?;
            let result = app.run(terminal);
            let restored = execute!(stdout(), DisableMouseCapture);
            ratatui::restore();
            restored?;
            result
        }
        Command::Chapters { id } => {
            let source = config.library.source()?;
            let book = load_book(source.as_ref(), &id).wrap_err("load book")?;
            for chapter in parse(&book.text).chapters {
                println!("{}\t{}", chapter.id, chapter.title);
            }
            Ok(())
        }
        Command::Search(search_args) => {
            let source = config.library.source()?;
            let book = load_book(source.as_ref(), &search_args.id).wrap_err("load book")?;
            let view = search(
                &book.text,
                &search_args.query,
                args::search_mode(search_args.literal),
            )?;
            match view {
                SearchView::Cleared => {}
                SearchView::NoResults => println!("no results"),
                SearchView::Results(results) => {
                    for result in results {
                        println!(
                            "{}\t{}\t{}",
                            result.chapter_id,
                            result.chapter_title,
                            result
                                .line
                                .marked("[", "]", |s| s.to_string())
                                .trim_end_matches('\r')
                        );
                    }
                }
            }
            Ok(())
        }
        Command::Export(export) => {
            if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&export.font_size) {
                bail!(
                    "font size must be between {MIN_FONT_SIZE} and {MAX_FONT_SIZE}, got {}",
                    export.font_size
                );
            }
            let source = config.library.source()?;
            let mut session = Session::default();
            session.load(source.as_ref(), &store, &export.id);
            if let Some(err) = &session.load_error {
                bail!("{err}");
            }

            let mut html = HtmlRenderer::default();
            session.present(&mut html);
            std::fs::write(&export.out, html.page(export.font_size))
                .wrap_err_with(|| format!("write export: {}", export.out.display()))?;
            tracing::info!(book = %export.id, out = %export.out.display(), "exported book");
            Ok(())
        }
        Command::Favorites { command } => match command {
            FavoritesCommand::List => {
                for id in store.load()? {
                    println!("{id}");
                }
                Ok(())
            }
            FavoritesCommand::Toggle { id } => {
                let now = favorites::toggle(&store, &id)?;
                println!("{} {id}", favorites::symbol(now));
                Ok(())
            }
        },
    }
}
