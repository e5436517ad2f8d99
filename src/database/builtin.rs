use std::error::Error;

use super::{question::QuestionRecord, RetrieveQuestions};

struct RawQuestion {
    category: &'static str,
    prompt: &'static str,
    options: &'static [&'static str],
    correct: usize,
    explanation: &'static str,
}

const QUESTIONS: &[RawQuestion] = &[
    RawQuestion {
        category: "Ancient Rus",
        prompt: "In which year did Prince Vladimir baptize Rus?",
        options: &["862", "988", "1054", "1147"],
        correct: 1,
        explanation: "Vladimir Sviatoslavich adopted Christianity from Byzantium and had Kievans baptized in the Dnieper in 988.",
    },
    RawQuestion {
        category: "Ancient Rus",
        prompt: "Who, according to the Primary Chronicle, was invited to rule Novgorod in 862?",
        options: &["Rurik", "Oleg", "Askold", "Sviatoslav"],
        correct: 0,
        explanation: "The chronicle tells of the calling of the Varangians: Rurik and his brothers came to rule in 862.",
    },
    RawQuestion {
        category: "Ancient Rus",
        prompt: "Which prince is credited with the first written law code of Rus, the Russkaya Pravda?",
        options: &["Yaroslav the Wise", "Igor", "Vladimir Monomakh", "Yuri Dolgoruky"],
        correct: 0,
        explanation: "",
    },
    RawQuestion {
        category: "Ancient Rus",
        prompt: "Moscow is first mentioned in the chronicles in which year?",
        options: &["1108", "1147", "1240", "1380"],
        correct: 1,
        explanation: "Yuri Dolgoruky invited his ally to a feast 'in Moskov' in 1147.",
    },
    RawQuestion {
        category: "Muscovy",
        prompt: "Which battle of 1380 was the first major victory of Rus over the Golden Horde?",
        options: &["Battle on the Ice", "Battle of Kulikovo", "Battle on the Kalka", "Great Stand on the Ugra"],
        correct: 1,
        explanation: "Dmitry Donskoy defeated Mamai on Kulikovo Field in September 1380.",
    },
    RawQuestion {
        category: "Muscovy",
        prompt: "The Great Stand on the Ugra River, which ended the Mongol yoke, took place in:",
        options: &["1380", "1453", "1480", "1547"],
        correct: 2,
        explanation: "",
    },
    RawQuestion {
        category: "Muscovy",
        prompt: "Who was the first Russian ruler crowned as Tsar?",
        options: &["Ivan III", "Vasily III", "Ivan IV", "Boris Godunov"],
        correct: 2,
        explanation: "Ivan IV (the Terrible) was crowned Tsar of All Rus in 1547.",
    },
    RawQuestion {
        category: "Muscovy",
        prompt: "Which dynasty came to the throne in 1613 after the Time of Troubles?",
        options: &["Rurikids", "Godunovs", "Romanovs", "Shuiskys"],
        correct: 2,
        explanation: "The Zemsky Sobor elected Mikhail Fyodorovich Romanov in 1613.",
    },
    RawQuestion {
        category: "Russian Empire",
        prompt: "In which year was Saint Petersburg founded?",
        options: &["1682", "1703", "1712", "1721"],
        correct: 1,
        explanation: "Peter I laid the Peter and Paul Fortress on Hare Island in May 1703.",
    },
    RawQuestion {
        category: "Russian Empire",
        prompt: "Which battle of 1709 decided the Great Northern War in Russia's favour?",
        options: &["Narva", "Poltava", "Gangut", "Borodino"],
        correct: 1,
        explanation: "",
    },
    RawQuestion {
        category: "Russian Empire",
        prompt: "Who commanded the Russian army at the Battle of Borodino in 1812?",
        options: &["Alexander Suvorov", "Mikhail Kutuzov", "Pyotr Bagration", "Michael Barclay de Tolly"],
        correct: 1,
        explanation: "Kutuzov had been appointed commander-in-chief a few weeks before the battle.",
    },
    RawQuestion {
        category: "Russian Empire",
        prompt: "Which emperor abolished serfdom in 1861?",
        options: &["Nicholas I", "Alexander I", "Alexander II", "Alexander III"],
        correct: 2,
        explanation: "The Emancipation Manifesto of Alexander II was signed on 19 February (3 March) 1861.",
    },
    RawQuestion {
        category: "20th Century",
        prompt: "In which year was the Union of Soviet Socialist Republics formed?",
        options: &["1917", "1918", "1922", "1924"],
        correct: 2,
        explanation: "The Treaty on the Creation of the USSR was signed in December 1922.",
    },
    RawQuestion {
        category: "20th Century",
        prompt: "Who was the first human to fly into space?",
        options: &["Gherman Titov", "Yuri Gagarin", "Alexei Leonov", "Valentina Tereshkova"],
        correct: 1,
        explanation: "Vostok 1 carried Gagarin around the Earth on 12 April 1961.",
    },
    RawQuestion {
        category: "20th Century",
        prompt: "How many days did the siege of Leningrad last?",
        options: &["500", "872", "900", "1000"],
        correct: 1,
        explanation: "",
    },
    RawQuestion {
        category: "20th Century",
        prompt: "Who was the last leader of the Soviet Union?",
        options: &["Leonid Brezhnev", "Yuri Andropov", "Konstantin Chernenko", "Mikhail Gorbachev"],
        correct: 3,
        explanation: "Gorbachev resigned on 25 December 1991 and the USSR was dissolved the next day.",
    },
];

/// Questions compiled into the binary; used when no database is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBank;

impl BuiltinBank {
    pub fn questions(&self) -> Vec<QuestionRecord> {
        QUESTIONS
            .iter()
            .filter_map(|raw| {
                let options = raw.options.iter().map(|o| o.to_string()).collect();
                match QuestionRecord::new(raw.category, raw.prompt, options, raw.correct, raw.explanation) {
                    Ok(question) => Some(question),
                    Err(e) => {
                        tracing::warn!("Skipping built-in question: {}", e);
                        None
                    }
                }
            })
            .collect()
    }
}

impl RetrieveQuestions for BuiltinBank {
    async fn retrieve_all_questions(
        &self,
    ) -> Result<Vec<QuestionRecord>, Box<dyn Error + Send + Sync>> {
        Ok(self.questions())
    }
}
