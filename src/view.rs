use crate::{catalog::Game, theme::Palette};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub const FIXES_HEADER: &str = "Fixes:";
pub const LINKS_HEADER: &str = "Download Links:";

/// Actions a view exposes; the shell decides how to carry them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    ShowDetails { index: usize },
    OpenLink { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    pub url: String,
}

impl DownloadLink {
    pub fn action(&self) -> ViewAction {
        ViewAction::OpenLink {
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardView {
    pub title: Line<'static>,
    pub summary: Line<'static>,
    pub action: ViewAction,
}

#[derive(Debug, Clone)]
pub struct DetailsView {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    pub links: Vec<DownloadLink>,
}

impl DetailsView {
    pub fn link_line(link: &DownloadLink, selected: bool, palette: &Palette) -> Line<'static> {
        let style = if selected {
            palette.highlight()
        } else {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::UNDERLINED)
        };
        Line::from(Span::styled(format!("• {}", link.label), style))
    }

    /// Text rendering with link targets spelled out, for non-interactive output.
    pub fn plain_lines(&self) -> Vec<String> {
        let mut out: Vec<String> = self.lines.iter().map(line_text).collect();
        out.extend(
            self.links
                .iter()
                .map(|link| format!("• {}: {}", link.label, link.url)),
        );
        out
    }
}

pub fn summary_line(game: &Game) -> String {
    format!(
        "DirectX: {}  •  .NET: {}  •  VC++: {}",
        game.directx_label(),
        game.dotnet_label(),
        game.vc_redist_label()
    )
}

pub fn card_view(index: usize, game: &Game, palette: &Palette) -> CardView {
    CardView {
        title: Line::from(Span::styled(
            game.name.clone(),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        summary: Line::from(Span::styled(
            summary_line(game),
            Style::default().fg(palette.subtle),
        )),
        action: ViewAction::ShowDetails { index },
    }
}

/// DirectX runtime first, then VC++ by ascending key, then .NET last.
pub fn download_links(game: &Game) -> Vec<DownloadLink> {
    let Some(downloads) = game.downloads.as_ref() else {
        return Vec::new();
    };
    let mut links = Vec::new();
    if let Some(url) = downloads.directx_url() {
        links.push(DownloadLink {
            label: "DirectX Runtime".to_string(),
            url: url.to_string(),
        });
    }
    for (key, url) in downloads.vc_redist_urls() {
        links.push(DownloadLink {
            label: format!("VC++ {key}"),
            url: url.to_string(),
        });
    }
    if let Some(url) = downloads.dotnet_url() {
        links.push(DownloadLink {
            label: format!(".NET Framework {}", game.dotnet_label()),
            url: url.to_string(),
        });
    }
    links
}

pub fn details_view(game: &Game, palette: &Palette) -> DetailsView {
    let text = Style::default().fg(palette.text);
    let subtle = Style::default().fg(palette.subtle);
    let header = Style::default()
        .fg(palette.text)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(format!("DirectX: {}", game.directx_label()), text)),
        Line::from(Span::styled(format!("VC++: {}", game.vc_redist_label()), text)),
        Line::from(Span::styled(format!(".NET: {}", game.dotnet_label()), text)),
    ];
    if let Some(dlls) = game.missing_dlls() {
        lines.push(Line::from(Span::styled(
            format!("Missing DLLs: {}", dlls.join(", ")),
            text,
        )));
    }

    // An empty-but-present list still gets its header.
    if let Some(fixes) = &game.fixes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(FIXES_HEADER, header)));
        for fix in fixes {
            lines.push(Line::from(Span::styled(format!("• {fix}"), subtle)));
        }
    }

    let links = download_links(game);
    if game.downloads.is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(LINKS_HEADER, header)));
    }

    DetailsView {
        title: format!("{} - Details", game.name),
        lines,
        links,
    }
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}
