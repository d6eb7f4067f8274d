// src/core/markup.rs
//! LaTeX rendering of a resume
//!
//! The document layout is fixed; only the content comes from the [`User`].
//! Every user string goes through [`escape_latex`] before it reaches the
//! markup.

use crate::types::user::{Education, Experience, User};

const PREAMBLE: &str = r"\documentclass[11pt,a4paper]{article}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage[margin=0.75in]{geometry}
\usepackage[hidelinks]{hyperref}
\usepackage{enumitem}
\usepackage{titlesec}

\pagestyle{empty}
\setlength{\parindent}{0pt}
\setlist[itemize]{leftmargin=*,noitemsep,topsep=2pt}
\titleformat{\section}{\large\bfseries}{}{0em}{}[\titlerule]
\titlespacing*{\section}{0pt}{10pt}{6pt}

\newcommand{\entry}[4]{%
  \textbf{#1} \hfill #2\\
  \textit{#3} \hfill \textit{#4}\par}
";

/// Escape the characters LaTeX treats specially.
pub fn escape_latex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '<' => out.push_str(r"\textless{}"),
            '>' => out.push_str(r"\textgreater{}"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

pub struct ResumeMarkup;

impl ResumeMarkup {
    /// Render the complete `.tex` source for `user`.
    pub fn render(user: &User) -> String {
        let mut tex = String::from(PREAMBLE);
        tex.push_str("\n\\begin{document}\n\n");

        Self::push_header(&mut tex, user);

        if !user.summary.trim().is_empty() {
            tex.push_str("\\section*{Summary}\n");
            tex.push_str(&format!("{}\n\n", escape_latex(&user.summary)));
        }

        if !user.experience.is_empty() {
            tex.push_str("\\section*{Experience}\n");
            for exp in &user.experience {
                Self::push_experience(&mut tex, exp);
            }
        }

        if !user.education.is_empty() {
            tex.push_str("\\section*{Education}\n");
            for edu in &user.education {
                Self::push_education(&mut tex, edu);
            }
        }

        if !user.skills.is_empty() {
            tex.push_str("\\section*{Skills}\n");
            tex.push_str("\\begin{itemize}\n");
            for group in &user.skills {
                let items = group
                    .items
                    .iter()
                    .map(|item| escape_latex(item))
                    .collect::<Vec<_>>()
                    .join(", ");
                if group.category.trim().is_empty() {
                    tex.push_str(&format!("  \\item {}\n", items));
                } else {
                    tex.push_str(&format!(
                        "  \\item \\textbf{{{}:}} {}\n",
                        escape_latex(&group.category),
                        items
                    ));
                }
            }
            tex.push_str("\\end{itemize}\n\n");
        }

        if !user.projects.is_empty() {
            tex.push_str("\\section*{Projects}\n");
            tex.push_str("\\begin{itemize}\n");
            for project in &user.projects {
                let mut line = format!("\\textbf{{{}}}", escape_latex(&project.name));
                if !project.url.trim().is_empty() {
                    line.push_str(&format!(" (\\url{{{}}})", escape_url(&project.url)));
                }
                if !project.description.trim().is_empty() {
                    line.push_str(&format!(" -- {}", escape_latex(&project.description)));
                }
                tex.push_str(&format!("  \\item {}\n", line));
            }
            tex.push_str("\\end{itemize}\n\n");
        }

        if !user.languages.is_empty() {
            tex.push_str("\\section*{Languages}\n");
            let languages = user
                .languages
                .iter()
                .map(|lang| {
                    if lang.level.trim().is_empty() {
                        escape_latex(&lang.name)
                    } else {
                        format!("{} ({})", escape_latex(&lang.name), escape_latex(&lang.level))
                    }
                })
                .collect::<Vec<_>>()
                .join(" \\textbullet{} ");
            tex.push_str(&format!("{}\n\n", languages));
        }

        tex.push_str("\\end{document}\n");
        tex
    }

    fn push_header(tex: &mut String, user: &User) {
        tex.push_str("\\begin{center}\n");
        tex.push_str(&format!(
            "  {{\\LARGE\\bfseries {}}}\\\\[4pt]\n",
            escape_latex(&user.name)
        ));
        if !user.title.trim().is_empty() {
            tex.push_str(&format!("  {{\\large {}}}\\\\[4pt]\n", escape_latex(&user.title)));
        }

        let mut contacts = Vec::new();
        if !user.email.trim().is_empty() {
            contacts.push(format!(
                "\\href{{mailto:{}}}{{{}}}",
                escape_url(&user.email),
                escape_latex(&user.email)
            ));
        }
        for plain in [&user.phone, &user.address] {
            if !plain.trim().is_empty() {
                contacts.push(escape_latex(plain));
            }
        }
        for link in [&user.website, &user.linkedin, &user.github] {
            if !link.trim().is_empty() {
                contacts.push(format!("\\url{{{}}}", escape_url(link)));
            }
        }
        if !contacts.is_empty() {
            tex.push_str(&format!("  {}\n", contacts.join(" $\\cdot$ ")));
        }
        tex.push_str("\\end{center}\n\n");
    }

    fn push_experience(tex: &mut String, exp: &Experience) {
        tex.push_str(&format!(
            "\\entry{{{}}}{{{}}}{{{}}}{{{}}}\n",
            escape_latex(&exp.title),
            exp.date_range().map(|d| escape_latex(&d)).unwrap_or_default(),
            escape_latex(&exp.company),
            escape_latex(&exp.location)
        ));
        if !exp.description.trim().is_empty() {
            tex.push_str(&format!("{}\n", escape_latex(&exp.description)));
        }
        if !exp.highlights.is_empty() {
            tex.push_str("\\begin{itemize}\n");
            for highlight in &exp.highlights {
                tex.push_str(&format!("  \\item {}\n", escape_latex(highlight)));
            }
            tex.push_str("\\end{itemize}\n");
        }
        tex.push_str("\\medskip\n\n");
    }

    fn push_education(tex: &mut String, edu: &Education) {
        tex.push_str(&format!(
            "\\entry{{{}}}{{{}}}{{{}}}{{{}}}\n",
            escape_latex(&edu.degree),
            edu.date_range().map(|d| escape_latex(&d)).unwrap_or_default(),
            escape_latex(&edu.institution),
            escape_latex(&edu.location)
        ));
        if !edu.description.trim().is_empty() {
            tex.push_str(&format!("{}\n", escape_latex(&edu.description)));
        }
        tex.push_str("\\medskip\n\n");
    }
}

// \url and \href read their argument verbatim except for these.
fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.trim().chars() {
        match c {
            '%' | '#' | '{' | '}' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
