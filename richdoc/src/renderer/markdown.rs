//! Markdown fallback compiler
//!
//! Compiles Markdown with pulldown-cmark, rewriting its event stream so that
//! code blocks, headings and links come out exactly as the structured compiler
//! writes them: code through the shared escaping emitter, headings with ids
//! allocated from the same render context, links with the same target/rel
//! defaults.

use super::code_block::code_block_html;
use super::compiler::anchor_link;
use super::context::RenderContext;
use super::escape::escape_html;
use super::marks::link_open_tag;
use crate::render_config::MarkdownOptions;
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Compile Markdown source to HTML
///
/// # Parameters
/// * `source` - Markdown text
/// * `ctx` - Per-render context; headings are recorded into it
///
/// # Returns
/// * `String` - The compiled markup
pub fn compile_markdown(source: &str, ctx: &mut RenderContext<'_>) -> String {
    let options = parser_options(&ctx.config().markdown);
    let parser = Parser::new_ext(source, options);
    let events = MarkdownRewriter::new(ctx).rewrite(parser);

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}

/// pulldown-cmark extensions enabled by the configuration
fn parser_options(options: &MarkdownOptions) -> Options {
    let mut parser_options = Options::empty();
    if options.tables {
        parser_options.insert(Options::ENABLE_TABLES);
    }
    if options.strikethrough {
        parser_options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if options.tasklists {
        parser_options.insert(Options::ENABLE_TASKLISTS);
    }
    parser_options
}

/// Language token of a fenced code block's info string (`json title="x"` → `json`)
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Code block being collected
struct CodeBuffer {
    language: Option<String>,
    code: String,
}

/// Heading being collected until its end tag, when its id is known
struct HeadingBuffer<'e> {
    level: u8,
    text: String,
    events: Vec<Event<'e>>,
}

/// Event stream rewriter state
struct MarkdownRewriter<'c, 'a, 'e> {
    /// Render context shared with the table of contents
    ctx: &'c mut RenderContext<'a>,

    /// Whether raw HTML passes through untouched
    allow_raw_html: bool,

    /// Current code block, if inside one
    code: Option<CodeBuffer>,

    /// Current heading, if inside one
    heading: Option<HeadingBuffer<'e>>,

    /// Rewritten events
    output: Vec<Event<'e>>,
}

impl<'c, 'a, 'e> MarkdownRewriter<'c, 'a, 'e> {
    fn new(ctx: &'c mut RenderContext<'a>) -> Self {
        let allow_raw_html = ctx.config().markdown.allow_raw_html;
        Self {
            ctx,
            allow_raw_html,
            code: None,
            heading: None,
            output: Vec::new(),
        }
    }

    /// Rewrite a full event stream
    fn rewrite<I>(mut self, events: I) -> Vec<Event<'e>>
    where
        I: Iterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event);
        }

        // Unterminated constructs cannot come out of pulldown-cmark, but flush
        // them rather than lose content.
        if self.code.is_some() {
            self.finish_code_block();
        }
        if self.heading.is_some() {
            self.finish_heading();
        }

        self.output
    }

    /// Process a single markdown event
    fn process_event(&mut self, event: Event<'e>) {
        if let Some(ref mut code) = self.code {
            match event {
                Event::Text(text) => code.code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.finish_code_block(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBuffer {
                    language,
                    code: String::new(),
                });
            }
            Event::Start(Tag::Heading { level, .. }) => {
                self.heading = Some(HeadingBuffer {
                    level: level as u8,
                    text: String::new(),
                    events: Vec::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) => self.finish_heading(),
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) => {
                let title: Option<&str> = (!title.is_empty()).then_some(&*title);
                self.emit(Event::Html(link_open_tag(&dest_url, title).into()));
            }
            Event::End(TagEnd::Link) => self.emit(Event::Html("</a>".into())),
            Event::Html(raw) | Event::InlineHtml(raw) if !self.allow_raw_html => {
                self.record_heading_text(&raw);
                self.emit(Event::Text(raw));
            }
            Event::SoftBreak | Event::HardBreak => {
                self.record_heading_text(" ");
                self.emit(event);
            }
            Event::Text(text) => {
                self.record_heading_text(&text);
                self.emit(Event::Text(text));
            }
            Event::Code(code) => {
                self.record_heading_text(&code);
                self.emit(Event::Code(code));
            }
            other => self.emit(other),
        }
    }

    /// Send an event to the current heading buffer, or to the output
    fn emit(&mut self, event: Event<'e>) {
        match self.heading {
            Some(ref mut heading) => heading.events.push(event),
            None => self.output.push(event),
        }
    }

    fn record_heading_text(&mut self, text: &str) {
        if let Some(ref mut heading) = self.heading {
            heading.text.push_str(text);
        }
    }

    fn finish_code_block(&mut self) {
        if let Some(code) = self.code.take() {
            let html = code_block_html(code.language.as_deref(), &code.code);
            self.emit(Event::Html(html.into()));
        }
    }

    fn finish_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };

        let id = self.ctx.assign_heading_id(&heading.text, heading.level);
        self.output.push(Event::Html(
            format!("<h{} id=\"{}\">", heading.level, escape_html(&id)).into(),
        ));
        self.output.extend(heading.events);
        if self.ctx.config().headings.anchor_links {
            self.output.push(Event::Html(anchor_link(&id).into()));
        }
        self.output
            .push(Event::Html(format!("</h{}>\n", heading.level).into()));
    }
}
