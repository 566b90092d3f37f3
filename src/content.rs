// 📰 Marketing Content - Landing hero and feature explainers
//
// Static German copy for the public pages. The server renders it; nothing
// else reads it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hero {
    pub headline: &'static str,
    pub subline: &'static str,
    pub primary_cta: &'static str,
    pub secondary_cta: &'static str,
}

pub const HERO: Hero = Hero {
    headline: "Behalte den Überblick über deine Finanzen",
    subline: "Budgify hilft dir, deine Ausgaben zu tracken, Budgets zu erstellen und finanzielle Ziele zu erreichen.",
    primary_cta: "Kostenlos starten",
    secondary_cta: "Demo ansehen",
};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Step {
    pub title: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Feature {
    /// URL segment under `/features/`; `None` for features without a page
    pub slug: Option<&'static str>,
    pub title: &'static str,
    /// One-liner for the feature grid
    pub summary: &'static str,
    /// Lead paragraph on the explainer page
    pub tagline: &'static str,
    pub steps: &'static [Step],
    pub closing: &'static str,
}

const fn step(title: &'static str, text: &'static str) -> Step {
    Step { title, text }
}

pub const FEATURES: &[Feature] = &[
    Feature {
        slug: Some("ausgabenanalyse"),
        title: "Ausgabenanalyse",
        summary: "Verfolge und analysiere deine Ausgaben nach Kategorien, um besser zu verstehen, wohin dein Geld fließt.",
        tagline: "Verstehe genau, wohin dein Geld fließt, und treffe fundierte Entscheidungen für deine finanzielle Zukunft.",
        steps: &[
            step(
                "Erfasse deine Ausgaben",
                "Gib deine Ausgaben manuell ein oder verbinde dein Bankkonto für automatische Updates.",
            ),
            step(
                "Kategorisiere Transaktionen",
                "Jede Ausgabe wird einer Kategorie zugeordnet, entweder automatisch oder manuell.",
            ),
            step(
                "Erhalte Einblicke",
                "Sieh dir detaillierte Grafiken und Berichte an, die dir helfen, deine Ausgabenmuster zu verstehen.",
            ),
        ],
        closing: "Starte noch heute mit Budgify und erhalte Einblicke in deine Finanzen.",
    },
    Feature {
        slug: Some("budgetplanung"),
        title: "Budgetplanung",
        summary: "Erstelle monatliche Budgets für verschiedene Kategorien und behalte den Überblick über deine Ausgaben.",
        tagline: "Setze Grenzen für deine Ausgaben, erreiche deine Sparziele und übernimm die Kontrolle über deine Finanzen.",
        steps: &[
            step(
                "Lege Budgetkategorien fest",
                "Erstelle Budgets für verschiedene Kategorien wie Lebensmittel, Transport oder Unterhaltung.",
            ),
            step(
                "Setze Budgetgrenzen",
                "Bestimme, wie viel du in jeder Kategorie ausgeben möchtest und passe die Grenzen bei Bedarf an.",
            ),
            step(
                "Überwache deine Ausgaben",
                "Verfolge, wie deine tatsächlichen Ausgaben im Vergleich zu deinen Budgets stehen und erhalte Benachrichtigungen.",
            ),
        ],
        closing: "Starte noch heute mit Budgify und übernimm die Kontrolle über deine Ausgaben.",
    },
    Feature {
        slug: Some("finanzielle-ziele"),
        title: "Finanzielle Ziele",
        summary: "Setze dir Sparziele und verfolge deinen Fortschritt, um deine finanziellen Träume zu verwirklichen.",
        tagline: "Definiere deine Sparziele, verfolge deinen Fortschritt und erreiche deine finanziellen Träume schneller.",
        steps: &[
            step(
                "Definiere dein Ziel",
                "Lege fest, wofür du sparen möchtest, wie viel Geld du benötigst und bis wann du es erreichen willst.",
            ),
            step(
                "Erstelle einen Sparplan",
                "Berechne, wie viel du regelmäßig sparen musst, und richte automatische Überweisungen ein.",
            ),
            step(
                "Verfolge deinen Fortschritt",
                "Behalte den Überblick über deine Sparbemühungen und feiere Meilensteine auf dem Weg zu deinem Ziel.",
            ),
        ],
        closing: "Starte noch heute mit Budgify und mache den ersten Schritt zu deinen Zielen.",
    },
    Feature {
        slug: Some("sparkonten"),
        title: "Sparkonten",
        summary: "Verwalte mehrere Sparkonten für verschiedene Ziele und optimiere deine Sparstrategie.",
        tagline: "Verwalte mehrere Sparkonten für unterschiedliche Ziele und optimiere deine Spar- und Anlagestrategie.",
        steps: &[
            step(
                "Erstelle Sparkonten",
                "Lege verschiedene Sparkonten für unterschiedliche Ziele an und bestimme deren Zweck.",
            ),
            step(
                "Richte Sparpläne ein",
                "Definiere, wie viel du regelmäßig auf jedes Konto einzahlen möchtest, und aktiviere automatische Überweisungen.",
            ),
            step(
                "Überwache das Wachstum",
                "Verfolge, wie deine Konten wachsen, und optimiere deine Strategie basierend auf Zinsen und Zielen.",
            ),
        ],
        closing: "Starte noch heute mit Budgify und nutze unsere Sparkonten-Tools für ein solides finanzielles Fundament.",
    },
    Feature {
        slug: None,
        title: "Erinnerungen",
        summary: "Erhalte Erinnerungen für anstehende Rechnungen und Zahlungen, um niemals eine Frist zu verpassen.",
        tagline: "",
        steps: &[],
        closing: "",
    },
    Feature {
        slug: None,
        title: "Finanzberichte",
        summary: "Erhalte detaillierte Berichte und Einblicke in deine finanzielle Situation auf monatlicher oder jährlicher Basis.",
        tagline: "",
        steps: &[],
        closing: "",
    },
];

/// Feature with its own explainer page
pub fn find_feature(slug: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.slug == Some(slug))
}

pub fn explainer_pages() -> impl Iterator<Item = &'static Feature> {
    FEATURES.iter().filter(|f| f.slug.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_explainer_pages() {
        let slugs: Vec<_> = explainer_pages().filter_map(|f| f.slug).collect();
        assert_eq!(
            slugs,
            vec!["ausgabenanalyse", "budgetplanung", "finanzielle-ziele", "sparkonten"]
        );
        assert!(explainer_pages().all(|f| f.steps.len() == 3));
    }

    #[test]
    fn test_find_feature() {
        assert_eq!(find_feature("sparkonten").map(|f| f.title), Some("Sparkonten"));
        assert!(find_feature("erinnerungen").is_none());
    }
}
