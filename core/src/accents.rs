use lazy_static::lazy_static;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// Position i of ACCENTED maps to position i of PLAIN.
const ACCENTED: &str = concat!(
    "äæǽöœüÄÜÖÀÁÂÃÄÅǺĀĂĄǍΑΆẢẠẦẪẨẬẰẮẴẲẶАàáâãåǻāăąǎªαάảạầấẫẩậằắẵẳặа",
    "БбÇĆĈĊČçćĉċčДдÐĎĐΔðďđδÈÉÊËĒĔĖĘĚΕΈẼẺẸỀẾỄỂỆЕЭèéêëēĕėęěέεẽẻẹềếễ",
    "ểệеэФфĜĞĠĢΓГҐĝğġģγгґĤĦĥħÌÍÎÏĨĪĬǏĮİΗΉΊΙΪỈỊИЫìíîïĩīĭǐįıηήίιϊỉị",
    "иыїĴĵĶΚКķκкĹĻĽĿŁΛЛĺļľŀłλлМмÑŃŅŇΝНñńņňŉνнÒÓÔÕŌŎǑŐƠØǾΟΌΩΏỎỌỒỐỖ",
    "ỔỘỜỚỠỞỢОòóôõōŏǒőơøǿºοόωώỏọồốỗổộờớỡởợоПпŔŖŘΡРŕŗřρрŚŜŞȘŠΣСśŝşș",
    "šſσςсȚŢŤŦτТțţťŧтÙÚÛŨŪŬŮŰŲƯǓǕǗǙǛŨỦỤỪỨỮỬỰУùúûũūŭůűųưǔǖǘǚǜυύϋủụ",
    "ừứữửựуÝŸŶΥΎΫỲỸỶỴЙýÿŷỳỹỷỵйŴŵŹŻŽΖЗźżžζзƒπβμ",
);

const PLAIN: &str = concat!(
    "aaaoouAUOAAAAAAAAAAAAAAAAAAAAAAAAAaaaaaaaaaaaaaaaaaaaaaaaaaa",
    "BbCCCCCcccccDdDDDDddddEEEEEEEEEEEEEEEEEEEEEeeeeeeeeeeeeeeeee",
    "eeeeFfGGGGGGGgggggggHHhhIIIIIIIIIIIIIIIIIIIiiiiiiiiiiiiiiiii",
    "iiiJjKKKkkkLLLLLLLlllllllMmNNNNNNnnnnnnnOOOOOOOOOOOOOOOOOOOO",
    "OOOOOOOOoooooooooooooooooooooooooooooPpRRRRRrrrrrSSSSSSSssss",
    "sssssTTTTTTtttttUUUUUUUUUUUUUUUUUUUUUUUUuuuuuuuuuuuuuuuuuuuu",
    "uuuuuuYYYYYYYYYYYyyyyyyyyWwZZZZZzzzzzfpvm",
);

lazy_static! {
    static ref TABLE: HashMap<char, char> = ACCENTED.chars().zip(PLAIN.chars()).collect();
}

/// Map accented Latin, Greek and Cyrillic letters to their unaccented Latin base form.
///
/// The input is NFC-composed first so that a base letter followed by a combining mark
/// is looked up as the precomposed character. Combining marks still trailing a mapped
/// letter are dropped. Characters outside the table pass through.
pub fn remove_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_mapped = false;
    for c in text.nfc() {
        if after_mapped && is_combining_mark(c) {
            continue;
        }
        match TABLE.get(&c) {
            Some(&plain) => {
                out.push(plain);
                after_mapped = true;
            }
            None => {
                out.push(c);
                after_mapped = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_aligned() {
        assert_eq!(ACCENTED.chars().count(), PLAIN.chars().count());
        assert!(PLAIN.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn strips_french_and_czech() {
        assert_eq!(remove_accents("crème brûlée"), "creme brulee");
        assert_eq!(remove_accents("áčďéěíňóřšťúůýž"), "acdeeinorstuuyz");
    }

    #[test]
    fn keeps_case_and_punctuation() {
        let input = "Bonjour ça va? C'est l'été! Ich möchte ä Ä á à â ê é è ë Ë É ï Ï î í ì ó ò ô ö Ö Ü ü ù ú û Û ý Ý ç Ç ñ Ñ";
        let expected = "Bonjour ca va? C'est l'ete! Ich mochte a A a a a e e e e E E i I i i i o o o o O U u u u u U y Y c C n N";
        assert_eq!(remove_accents(input), expected);
    }

    #[test]
    fn composes_combining_marks() {
        // "e" + COMBINING ACUTE ACCENT
        assert_eq!(remove_accents("cafe\u{301}"), "cafe");
    }

    #[test]
    fn idempotent() {
        for s in [
            "Příliš žluťoučký kůň úpěl ďábelské ódy",
            "Ωμέγα",
            "plain ascii",
            "",
            "e\u{301}\u{301}",
            "é\u{301}",
            "q\u{301}",
        ] {
            let once = remove_accents(s);
            assert_eq!(remove_accents(&once), once);
        }
    }

    #[test]
    fn stacked_marks_are_dropped_with_the_accent() {
        assert_eq!(remove_accents("e\u{301}\u{301}"), "e");
        assert_eq!(remove_accents("é\u{301}x"), "ex");
        // unmapped base keeps its mark
        assert_eq!(remove_accents("q\u{301}"), "q\u{301}");
    }
}
