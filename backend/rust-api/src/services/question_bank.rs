use rand::seq::{IndexedRandom, SliceRandom};

use super::quiz_service::QuizError;

/// Length of one round.
pub const TOTAL_QUESTIONS: usize = 5;

/// Question text -> canonical answer, grouped thematically.
static QUESTION_BANK: &[(&str, &str)] = &[
    // Tectonique des plaques
    (
        "Les dorsales sont des zones où les plaques tectoniques",
        "S'éloignent.",
    ),
    (
        "Quelle est la conséquence principale des failles transformantes ?",
        "Tremblement de terre.",
    ),
    (
        "Dans une zone de subduction, quelle plaque s'enfonce sous l'autre ?",
        "La plus lourde.",
    ),
    (
        "Quel phénomène se produit lorsque deux plaques continentales entrent en collision ?",
        "Formation de chaînes de montagnes.",
    ),
    (
        "Quelle est la vitesse moyenne de déplacement des plaques tectoniques ?",
        "Quelques centimètres par an.",
    ),
    (
        "Quel type de frontière de plaque est associé à la formation de fosses océaniques ?",
        "Convergente (subduction).",
    ),
    // Volcans
    (
        "Pourquoi les volcans se forment-ils souvent dans les zones de subduction ?",
        "Parce que la plaque qui s'enfonce libère du magma.",
    ),
    (
        "Comment appelle-t-on une montagne formée par l'accumulation de lave ?",
        "Un volcan.",
    ),
    (
        "Quelle roche sort des volcans lors des éruptions ?",
        "Le magma (lave).",
    ),
    (
        "Quel type de volcan est caractérisé par des éruptions explosives et des pentes raides ?",
        "Un stratovolcan.",
    ),
    (
        "Quel gaz est le plus couramment émis lors d'une éruption volcanique ?",
        "La vapeur d'eau (H₂O).",
    ),
    (
        "Quel est le nom du volcan le plus actif d'Haïti ?",
        "La Soufrière (en réalité, Haïti n'a pas de volcan actif, mais la question peut servir à sensibiliser).",
    ),
    (
        "Comment s'appelle la ceinture de volcans autour du Pacifique ?",
        "La ceinture de feu.",
    ),
    (
        "Quel est le nom du supercontinent qui existait il y a 200 millions d'années ?",
        "La Pangée.",
    ),
    // Séismes
    (
        "Quel instrument permet de mesurer les séismes ?",
        "Un sismographe.",
    ),
    (
        "Sur quelle échelle mesure-t-on la magnitude des séismes ?",
        "L'échelle de Richter.",
    ),
    (
        "Comment appelle-t-on l'onde la plus rapide générée par un séisme ?",
        "L'onde P.",
    ),
    (
        "Comment appelle-t-on l'onde la plus destructrice lors d'un séisme ?",
        "L'onde S.",
    ),
    (
        "Quelle énergie est libérée lors d'un séisme ?",
        "L'énergie élastique accumulée.",
    ),
    (
        "Quel séisme majeur a frappé Haïti le 12 janvier 2010 ?",
        "Magnitude 7.0.",
    ),
    (
        "Quelle ville d'Haïti a été la plus touchée par le séisme de 2010 ?",
        "Port-au-Prince.",
    ),
    (
        "Quel type de faille provoque des séismes destructeurs comme en Haïti ?",
        "Faille transformante.",
    ),
    (
        "Quel est le nom de la faille responsable du séisme de 2010 en Haïti ?",
        "La faille d'Enriquillo-Plantain Garden.",
    ),
    (
        "Combien de personnes environ ont été touchées par le séisme de 2010 en Haïti ?",
        "Plus de 3 millions.",
    ),
    (
        "Quel est le nom du tsunami dévastateur qui a suivi un séisme en 2004 dans l'océan Indien ?",
        "Tsunami de 2004.",
    ),
    (
        "Quelle est la différence entre l'épicentre et l'hypocentre d'un séisme ?",
        "L'épicentre est à la surface, l'hypocentre est en profondeur.",
    ),
    // Géologie générale
    (
        "Comment appelle-t-on la zone de fusion partielle des roches dans le manteau terrestre ?",
        "L'asthénosphère.",
    ),
    (
        "Quelle est la couche la plus externe de la Terre ?",
        "La croûte terrestre.",
    ),
    (
        "Quelle est la température approximative du noyau terrestre ?",
        "Environ 5000 à 6000 °C.",
    ),
    (
        "Quel minéral est le plus abondant dans la croûte continentale ?",
        "Le feldspath.",
    ),
    // Haïti et la Caraïbe
    (
        "Haïti est situé entre quelles plaques tectoniques principales ?",
        "La plaque Caraïbes et la plaque Nord-Américaine.",
    ),
    (
        "Quel pays est le plus exposé aux séismes après Haïti dans la Caraïbe ?",
        "La République Dominicaine.",
    ),
    (
        "Quelle île des Antilles est connue pour son volcan actif, la Soufrière ?",
        "La Guadeloupe.",
    ),
    (
        "Quel est le nom du volcan actif situé en Martinique ?",
        "La Montagne Pelée.",
    ),
    (
        "Quel phénomène naturel est souvent associé aux séismes sous-marins ?",
        "Les tsunamis.",
    ),
    // Prévention et sensibilisation
    (
        "Quel est le premier réflexe à avoir en cas de séisme ?",
        "Se mettre à l'abri sous une table solide.",
    ),
    (
        "Quel organisme international coordonne les secours en cas de catastrophe naturelle ?",
        "L'ONU (via des agences comme l'UNICEF ou la Croix-Rouge).",
    ),
    (
        "Quel est l'objectif principal des exercices de simulation de séisme ?",
        "Préparer la population à réagir rapidement et efficacement.",
    ),
    (
        "Quel type de construction résiste le mieux aux séismes ?",
        "Les bâtiments parasismiques.",
    ),
    // Divers
    (
        "Quel type de mouvement crée les chaînes de montagnes comme l'Himalaya ?",
        "La collision de plaques.",
    ),
    (
        "Quel est le nom du point où un séisme commence à se propager ?",
        "L'hypocentre.",
    ),
    (
        "Quel est le nom de la théorie qui explique le mouvement des plaques tectoniques ?",
        "La tectonique des plaques.",
    ),
    (
        "Quel océan est entouré par la ceinture de feu du Pacifique ?",
        "L'océan Pacifique.",
    ),
    (
        "Quel est le nom du plus grand volcan actif du monde ?",
        "Mauna Loa (Hawaï).",
    ),
    (
        "Quel est le nom du séisme le plus puissant jamais enregistré ?",
        "Séisme de Valdivia (1960, magnitude 9.5).",
    ),
];

/// Story beats shown as the player advances through the ruined city. The
/// final entry is the intro line, shown while progress is still zero.
static NARRATION: &[&str] = &[
    "🌍 La terre tremble... ",
    "🏚️ Tu avances dans une rue effondrée, des débris bloquent le passage.",
    "🚧 Tu trouves un passage étroit entre deux bâtiments.",
    "🧍‍♂️ Tu aides une famille coincée sous les gravats.",
    "🚪 Tu vois enfin la sortie de la ville…",
    "Tu entres dans la ville fissurée... ",
];

pub struct QuestionBank;

impl QuestionBank {
    pub fn size() -> usize {
        QUESTION_BANK.len()
    }

    pub fn questions() -> impl Iterator<Item = &'static str> {
        QUESTION_BANK.iter().map(|&(question, _)| question)
    }

    /// Canonical answer for a question, if the question exists in the bank.
    pub fn answer_for(question: &str) -> Option<&'static str> {
        QUESTION_BANK
            .iter()
            .find(|&&(q, _)| q == question)
            .map(|&(_, answer)| answer)
    }

    /// Picks a question uniformly at random among those not yet answered.
    pub fn pick_question(done: &[String]) -> Result<(&'static str, &'static str), QuizError> {
        let available: Vec<(&str, &str)> = QUESTION_BANK
            .iter()
            .copied()
            .filter(|&(q, _)| !done.iter().any(|d| d == q))
            .collect();

        let mut rng = rand::rng();
        available
            .choose(&mut rng)
            .copied()
            .ok_or(QuizError::NoQuestionsRemaining)
    }

    /// Builds the 3-option multiple-choice set: the canonical answer plus
    /// two distinct distractors drawn without replacement from the other
    /// answers, in shuffled order.
    pub fn build_options(correct: &str) -> Vec<String> {
        let others: Vec<&str> = QUESTION_BANK
            .iter()
            .map(|&(_, answer)| answer)
            .filter(|&answer| answer != correct)
            .collect();

        let mut rng = rand::rng();
        let mut options: Vec<String> = others
            .choose_multiple(&mut rng, 2)
            .map(|distractor| distractor.to_string())
            .collect();
        options.push(correct.to_string());
        options.shuffle(&mut rng);
        options
    }

    /// Narration line for the given progress. Progress zero shows the
    /// intro (last entry); past the end of the story, an empty string.
    pub fn narration_line(progress: usize) -> &'static str {
        if progress == 0 {
            return NARRATION[NARRATION.len() - 1];
        }
        NARRATION.get(progress - 1).copied().unwrap_or("")
    }
}
