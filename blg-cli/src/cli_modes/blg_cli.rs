use crate::{
    BaseCli, RenderOptions,
    common::{CliModeResult, confirm, create_editor_buffer, resolve_editor},
    render::Renderer,
    ui::{BlogUi, SubmitOutcome, ViewQuery},
};
use anyhow::Result;
use blg_core::{Blog, Config, Entry, FileStore};
use log::debug;

pub struct BlgCli {
    cli: BaseCli,
    renderer: Renderer,
    config: Config,
    blog: Blog<FileStore>,
}

impl BlgCli {
    pub fn new(cli: BaseCli, config: Config, blog: Blog<FileStore>) -> Self {
        let options = cli.load();

        let renderer = Renderer::new(Some(RenderOptions {
            timestamp_format: config.timestamp_format.clone(),
            use_color: options.use_color,
            short_mode: options.short_mode,
        }));
        debug!("using posts in {}", config.store_path().display());
        BlgCli {
            cli,
            renderer,
            config,
            blog,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        if self.cli.path {
            self.renderer
                .print_info(&format!("{}", self.config.store_path().display()));
            return Ok(());
        }

        if let CliModeResult::Finish = self.tags_mode()? {
            return Ok(());
        };

        if let CliModeResult::Finish = self.delete_mode()? {
            return Ok(());
        };

        if let CliModeResult::Finish = self.edit_mode()? {
            return Ok(());
        };

        if let CliModeResult::Finish = self.read_mode()? {
            return Ok(());
        };

        if let CliModeResult::Finish = self.write_mode()? {
            return Ok(());
        };

        self.list_mode()
    }

    pub fn tags_mode(&self) -> Result<CliModeResult> {
        if !self.cli.all_tags {
            return Ok(CliModeResult::NothingToDo);
        }
        let tags = self.blog.all_tags();
        if self.cli.count {
            self.renderer
                .print_info(&format!("{} tags found.", tags.len()));
        } else if tags.is_empty() {
            self.renderer.print_info("No tags found.");
        } else {
            self.renderer.print_tags(&tags);
        }
        Ok(CliModeResult::Finish)
    }

    pub fn write_mode(&mut self) -> Result<CliModeResult> {
        let Some(title) = self.cli.title() else {
            return Ok(CliModeResult::NothingToDo);
        };
        let content = match &self.cli.content {
            Some(content) => content.clone(),
            None => {
                let editor = resolve_editor(&self.config.editor)?;
                create_editor_buffer(&editor, "")?
            }
        };

        let mut ui = BlogUi::new(&mut self.blog);
        let form = ui.form_mut();
        form.title = title;
        form.content = content;
        form.tags = self.cli.tags.clone().unwrap_or_default();

        let outcome = ui.submit()?;
        report_outcome(&self.renderer, &self.config, outcome);
        Ok(CliModeResult::Finish)
    }

    pub fn edit_mode(&mut self) -> Result<CliModeResult> {
        let Some(id) = self.cli.edit else {
            return Ok(CliModeResult::NothingToDo);
        };

        let mut ui = BlogUi::new(&mut self.blog);
        if !ui.begin_edit(id) {
            self.renderer.print_info(&format!("No post with id {id}."));
            return Ok(CliModeResult::Finish);
        }
        debug!("{} {id}", ui.form_heading());

        let title = self.cli.title();
        let given = title.is_some() || self.cli.content.is_some() || self.cli.tags.is_some();
        let form = ui.form_mut();
        if let Some(title) = title {
            form.title = title;
        }
        if let Some(content) = &self.cli.content {
            form.content = content.clone();
        }
        if let Some(tags) = &self.cli.tags {
            form.tags = tags.clone();
        }
        if !given {
            let editor = resolve_editor(&self.config.editor)?;
            form.content = create_editor_buffer(&editor, &form.content)?;
        }

        let outcome = ui.submit()?;
        report_outcome(&self.renderer, &self.config, outcome);
        Ok(CliModeResult::Finish)
    }

    pub fn delete_mode(&mut self) -> Result<CliModeResult> {
        let Some(id) = self.cli.delete else {
            return Ok(CliModeResult::NothingToDo);
        };

        let mut ui = BlogUi::new(&mut self.blog);
        match ui.blog().get(id) {
            Some(entry) => self.renderer.print_entry_line(entry),
            None => {
                self.renderer.print_info(&format!("No post with id {id}."));
                return Ok(CliModeResult::Finish);
            }
        }

        let confirmed = self.cli.yes || confirm("Delete this post?")?;
        if ui.delete(id, || confirmed)? {
            self.renderer.print_info(&format!("Deleted post {id}."));
        } else {
            self.renderer.print_info("Nothing deleted.");
        }
        Ok(CliModeResult::Finish)
    }

    pub fn read_mode(&mut self) -> Result<CliModeResult> {
        if let Some(id) = self.cli.show {
            match self.blog.get(id) {
                Some(entry) => self.renderer.print_entries(&[entry], None),
                None => self.renderer.print_info(&format!("No post with id {id}.")),
            }
            return Ok(CliModeResult::Finish);
        }

        let mut ui = BlogUi::new(&mut self.blog);
        match (&self.cli.search, &self.cli.tag) {
            (Some(keyword), _) => ui.set_query(keyword),
            (None, Some(tag)) if self.cli.exact => ui.filter_tag(tag),
            (None, Some(tag)) => ui.select_tag(tag),
            (None, None) => return Ok(CliModeResult::NothingToDo),
        }

        let highlight = match ui.query() {
            ViewQuery::Keyword(keyword) => Some(keyword.as_str()),
            _ => None,
        };
        print_results(&self.renderer, &ui.visible_entries(), highlight, self.cli.count);
        Ok(CliModeResult::Finish)
    }

    pub fn list_mode(&mut self) -> Result<()> {
        let ui = BlogUi::new(&mut self.blog);
        print_results(&self.renderer, &ui.visible_entries(), None, self.cli.count);
        Ok(())
    }
}

fn report_outcome(renderer: &Renderer, config: &Config, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Created(entry) => {
            renderer.print_info(&format!(
                "Added new post to {}",
                config.store_path().display()
            ));
            renderer.print_entry_line(&entry);
        }
        SubmitOutcome::Updated(entry) => {
            renderer.print_info(&format!("Updated post {}", entry.id));
            renderer.print_entry_line(&entry);
        }
        SubmitOutcome::Rejected => {
            renderer.print_info("Nothing saved, a post needs both a title and some content.");
        }
        SubmitOutcome::NotFound(id) => {
            renderer.print_info(&format!("No post with id {id}."));
        }
    }
}

fn print_results(renderer: &Renderer, entries: &[&Entry], highlight: Option<&str>, count: bool) {
    if count {
        renderer.print_info(&format!("{} posts found.", entries.len()));
        return;
    }
    if entries.is_empty() {
        renderer.print_info("No posts found.");
    } else {
        renderer.print_entries(entries, highlight);
    }
}
