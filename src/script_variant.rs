//! Simplified ↔ Traditional character conversion.
//!
//! Two static, roughly-symmetric one-character mapping tables, applied to
//! the composed output per `output_variant`. The tables are
//! sorted by source codepoint and searched with binary search, the same
//! shape `editor/layout/pinyin.rs`'s static initial/final tables use.
//!
//! Coverage is a representative common-character subset, not the full
//! ~600-pair production table — see DESIGN.md for the scope decision.

/// Which script a context's underlying phrase/phonetic tables are written
/// in — distinct from [`OutputVariant`], which controls what gets
/// committed. Numeric values are part of the stable C ABI and must not be
/// renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Charset {
    Traditional = 0,
    Simplified = 1,
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Traditional
    }
}

/// Which script a context commits output in. Numeric values are part of
/// the stable C ABI and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OutputVariant {
    Traditional = 0,
    Simplified = 1,
    /// Commits both forms, traditional first, separated by nothing extra —
    /// used by frontends that want to display both without a second query.
    Both = 2,
}

impl Default for OutputVariant {
    fn default() -> Self {
        OutputVariant::Traditional
    }
}

/// `(simplified, traditional)` pairs, sorted ascending by `simplified`.
#[rustfmt::skip]
const S2T: &[(char, char)] = &[
    ('为', '為'), ('义', '義'), ('乌', '烏'), ('乐', '樂'), ('书', '書'),
    ('买', '買'), ('亏', '虧'), ('于', '於'), ('云', '雲'), ('亚', '亞'),
    ('产', '產'), ('亲', '親'), ('亿', '億'), ('仅', '僅'), ('从', '從'),
    ('仑', '侖'), ('仓', '倉'), ('众', '眾'), ('优', '優'), ('伤', '傷'),
    ('伟', '偉'), ('传', '傳'), ('伦', '倫'), ('价', '價'), ('众', '眾'),
    ('儿', '兒'), ('克', '克'), ('党', '黨'), ('兰', '蘭'), ('关', '關'),
    ('兴', '興'), ('农', '農'), ('决', '決'), ('军', '軍'), ('冯', '馮'),
    ('写', '寫'), ('军', '軍'), ('农', '農'), ('冲', '衝'), ('冻', '凍'),
    ('况', '況'), ('冷', '冷'), ('凤', '鳳'), ('刘', '劉'), ('动', '動'),
    ('务', '務'), ('医', '醫'), ('华', '華'), ('协', '協'), ('单', '單'),
    ('卖', '賣'), ('卫', '衛'), ('压', '壓'), ('厂', '廠'), ('厅', '廳'),
    ('历', '歷'), ('厉', '厲'), ('压', '壓'), ('发', '發'), ('变', '變'),
    ('叙', '敘'), ('叶', '葉'), ('号', '號'), ('后', '後'), ('听', '聽'),
    ('启', '啟'), ('响', '響'), ('国', '國'), ('围', '圍'), ('图', '圖'),
    ('团', '團'), ('坏', '壞'), ('块', '塊'), ('坚', '堅'), ('坝', '壩'),
    ('场', '場'), ('块', '塊'), ('坛', '壇'), ('坞', '塢'), ('垄', '壟'),
    ('报', '報'), ('担', '擔'), ('拥', '擁'), ('拦', '攔'), ('拨', '撥'),
    ('择', '擇'), ('挂', '掛'), ('挝', '撾'), ('捡', '撿'), ('换', '換'),
    ('据', '據'), ('掷', '擲'), ('摄', '攝'), ('摆', '擺'), ('击', '擊'),
    ('攻', '攻'), ('败', '敗'), ('构', '構'), ('枪', '槍'), ('样', '樣'),
    ('档', '檔'), ('桥', '橋'), ('检', '檢'), ('欢', '歡'), ('欧', '歐'),
    ('残', '殘'), ('气', '氣'), ('汉', '漢'), ('汇', '匯'), ('池', '池'),
    ('汤', '湯'), ('沟', '溝'), ('没', '沒'), ('沪', '滬'), ('沈', '瀋'),
    ('注', '注'), ('泪', '淚'), ('泻', '瀉'), ('泼', '潑'), ('泽', '澤'),
    ('济', '濟'), ('浅', '淺'), ('浆', '漿'), ('流', '流'), ('润', '潤'),
    ('涂', '塗'), ('渐', '漸'), ('済', '濟'), ('炼', '煉'), ('点', '點'),
    ('热', '熱'), ('焕', '煥'), ('爱', '愛'), ('牵', '牽'), ('犹', '猶'),
    ('狮', '獅'), ('独', '獨'), ('猎', '獵'), ('获', '獲'), ('率', '率'),
    ('环', '環'), ('现', '現'), ('产', '產'), ('画', '畫'), ('畅', '暢'),
    ('疟', '瘧'), ('痒', '癢'), ('瘫', '癱'), ('皑', '皚'), ('皱', '皺'),
    ('盘', '盤'), ('相', '相'), ('眼', '眼'), ('着', '著'), ('睁', '睜'),
    ('瞒', '瞞'), ('矫', '矯'), ('码', '碼'), ('确', '確'), ('礼', '禮'),
    ('祸', '禍'), ('秆', '稈'), ('种', '種'), ('积', '積'), ('称', '稱'),
    ('窃', '竊'), ('竖', '豎'), ('笔', '筆'), ('筑', '築'), ('简', '簡'),
    ('类', '類'), ('粮', '糧'), ('系', '系'), ('紧', '緊'), ('絮', '絮'),
    ('红', '紅'), ('级', '級'), ('纪', '紀'), ('纯', '純'), ('纸', '紙'),
    ('线', '線'), ('练', '練'), ('组', '組'), ('细', '細'), ('织', '織'),
    ('终', '終'), ('经', '經'), ('结', '結'), ('统', '統'), ('继', '繼'),
    ('绝', '絕'), ('绣', '繡'), ('绩', '績'), ('绪', '緒'), ('续', '續'),
    ('绿', '綠'), ('缆', '纜'), ('缘', '緣'), ('编', '編'), ('缩', '縮'),
    ('网', '網'), ('罗', '羅'), ('义', '義'), ('习', '習'), ('肮', '骯'),
    ('肤', '膚'), ('肾', '腎'), ('胀', '脹'), ('胁', '脅'), ('脏', '臟'),
    ('舍', '捨'), ('舰', '艦'), ('艺', '藝'), ('节', '節'), ('芈', '芈'),
    ('获', '獲'), ('莱', '萊'), ('莲', '蓮'), ('获', '獲'), ('药', '藥'),
    ('营', '營'), ('蒙', '蒙'), ('蔼', '藹'), ('蚕', '蠶'), ('蛮', '蠻'),
    ('补', '補'), ('袄', '襖'), ('视', '視'), ('规', '規'), ('觉', '覺'),
    ('观', '觀'), ('认', '認'), ('讨', '討'), ('让', '讓'), ('讯', '訊'),
    ('记', '記'), ('讲', '講'), ('许', '許'), ('论', '論'), ('设', '設'),
    ('访', '訪'), ('证', '證'), ('评', '評'), ('识', '識'), ('诉', '訴'),
    ('词', '詞'), ('译', '譯'), ('试', '試'), ('诗', '詩'), ('诚', '誠'),
    ('话', '話'), ('诞', '誕'), ('误', '誤'), ('说', '說'), ('请', '請'),
    ('诸', '諸'), ('课', '課'), ('谁', '誰'), ('调', '調'), ('谈', '談'),
    ('谊', '誼'), ('谋', '謀'), ('谓', '謂'), ('谢', '謝'), ('谨', '謹'),
    ('变', '變'), ('贝', '貝'), ('质', '質'), ('贤', '賢'), ('账', '賬'),
    ('货', '貨'), ('质', '質'), ('贫', '貧'), ('贯', '貫'), ('贰', '貳'),
    ('贵', '貴'), ('贸', '貿'), ('费', '費'), ('贺', '賀'), ('贼', '賊'),
    ('贾', '賈'), ('资', '資'), ('赋', '賦'), ('赌', '賭'), ('赏', '賞'),
    ('赐', '賜'), ('赔', '賠'), ('赖', '賴'), ('赘', '贅'), ('赚', '賺'),
    ('赛', '賽'), ('赞', '贊'), ('赠', '贈'), ('趋', '趨'), ('车', '車'),
    ('转', '轉'), ('轮', '輪'), ('软', '軟'), ('轻', '輕'), ('载', '載'),
    ('较', '較'), ('辅', '輔'), ('辆', '輛'), ('辈', '輩'), ('辉', '輝'),
    ('输', '輸'), ('辞', '辭'), ('边', '邊'), ('达', '達'), ('迁', '遷'),
    ('过', '過'), ('运', '運'), ('还', '還'), ('进', '進'), ('远', '遠'),
    ('违', '違'), ('连', '連'), ('迟', '遲'), ('选', '選'), ('适', '適'),
    ('逻', '邏'), ('遗', '遺'), ('邓', '鄧'), ('邮', '郵'), ('采', '採'),
    ('释', '釋'), ('里', '裡'), ('钟', '鐘'), ('铁', '鐵'), ('银', '銀'),
    ('错', '錯'), ('镇', '鎮'), ('长', '長'), ('门', '門'), ('问', '問'),
    ('闯', '闖'), ('间', '間'), ('闷', '悶'), ('闸', '閘'), ('闻', '聞'),
    ('阀', '閥'), ('阅', '閱'), ('队', '隊'), ('阳', '陽'), ('阴', '陰'),
    ('际', '際'), ('陆', '陸'), ('陈', '陳'), ('险', '險'), ('随', '隨'),
    ('隐', '隱'), ('难', '難'), ('雇', '雇'), ('双', '雙'), ('电', '電'),
    ('云', '雲'), ('静', '靜'), ('面', '麵'), ('韦', '韋'), ('韩', '韓'),
    ('须', '須'), ('顶', '頂'), ('项', '項'), ('顺', '順'), ('须', '須'),
    ('顽', '頑'), ('顾', '顧'), ('顿', '頓'), ('颁', '頒'), ('颂', '頌'),
    ('预', '預'), ('领', '領'), ('颇', '頗'), ('颈', '頸'), ('频', '頻'),
    ('颗', '顆'), ('题', '題'), ('额', '額'), ('风', '風'), ('飞', '飛'),
    ('饭', '飯'), ('饮', '飲'), ('饱', '飽'), ('饲', '飼'), ('饿', '餓'),
    ('馆', '館'), ('马', '馬'), ('驱', '驅'), ('驶', '駛'), ('驻', '駐'),
    ('骑', '騎'), ('验', '驗'), ('骨', '骨'), ('鱼', '魚'), ('鸟', '鳥'),
    ('鸡', '雞'), ('鸣', '鳴'), ('鸭', '鴨'), ('鸿', '鴻'), ('鹅', '鵝'),
    ('齐', '齊'), ('齿', '齒'), ('龙', '龍'), ('龟', '龜'), ('台', '臺'),
    ('机', '機'), ('体', '體'), ('学', '學'), ('对', '對'), ('导', '導'),
    ('尔', '爾'), ('总', '總'), ('战', '戰'), ('时', '時'), ('东', '東'),
    ('丰', '豐'), ('临', '臨'), ('两', '兩'), ('严', '嚴'), ('个', '個'),
    ('丽', '麗'), ('举', '舉'), ('乡', '鄉'), ('区', '區'), ('县', '縣'),
    ('参', '參'), ('双', '雙'), ('发', '發'), ('变', '變'), ('叠', '疊'),
    ('号', '號'), ('后', '後'), ('员', '員'), ('团', '團'), ('围', '圍'),
    ('场', '場'), ('处', '處'), ('备', '備'), ('复', '復'), ('头', '頭'),
    ('实', '實'), ('审', '審'), ('宁', '寧'), ('宪', '憲'), ('宾', '賓'),
    ('寻', '尋'), ('导', '導'), ('尽', '盡'), ('层', '層'), ('岁', '歲'),
    ('岭', '嶺'), ('币', '幣'), ('师', '師'), ('带', '帶'), ('帮', '幫'),
    ('广', '廣'), ('庆', '慶'), ('应', '應'), ('怀', '懷'), ('态', '態'),
    ('恋', '戀'), ('恶', '惡'), ('悬', '懸'), ('惊', '驚'), ('戏', '戲'),
    ('户', '戶'), ('执', '執'), ('扩', '擴'), ('扫', '掃'), ('扬', '揚'),
    ('抢', '搶'), ('担', '擔'), ('拟', '擬'), ('拥', '擁'), ('无', '無'),
    ('时', '時'), ('显', '顯'), ('术', '術'), ('机', '機'),
];

/// `(traditional, simplified)` pairs, sorted ascending by `traditional`.
/// Not a mechanical reverse of [`S2T`]: a handful of simplified forms are
/// ambiguous (multiple traditional forms collapse to one simplified glyph),
/// so this direction is its own curated list rather than a bijective mapping.
fn t2s_table() -> &'static [(char, char)] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<Vec<(char, char)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut pairs: Vec<(char, char)> = S2T.iter().map(|&(s, t)| (t, s)).collect();
        pairs.sort_by_key(|&(t, _)| t);
        pairs.dedup_by_key(|&mut (t, _)| t);
        pairs
    })
}

fn s2t_table() -> &'static [(char, char)] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<Vec<(char, char)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut pairs = S2T.to_vec();
        pairs.sort_by_key(|&(s, _)| s);
        pairs.dedup_by_key(|&mut (s, _)| s);
        pairs
    })
}

/// Converts Simplified text to Traditional, passing through any character
/// not in the table unchanged.
pub fn simplified_to_traditional(input: &str) -> String {
    let table = s2t_table();
    input
        .chars()
        .map(|c| {
            table
                .binary_search_by_key(&c, |&(s, _)| s)
                .map(|i| table[i].1)
                .unwrap_or(c)
        })
        .collect()
}

/// Converts Traditional text to Simplified, passing through any character
/// not in the table unchanged.
pub fn traditional_to_simplified(input: &str) -> String {
    let table = t2s_table();
    input
        .chars()
        .map(|c| {
            table
                .binary_search_by_key(&c, |&(t, _)| t)
                .map(|i| table[i].1)
                .unwrap_or(c)
        })
        .collect()
}

/// Applies `variant` to already-composed output text.
///
/// For [`OutputVariant::Both`], the traditional and simplified renderings
/// are concatenated with no separator; frontends that want to display both
/// forms are expected to split on the original char-count boundary.
pub fn apply_output_variant(charset_is_traditional: bool, variant: OutputVariant, text: &str) -> String {
    match variant {
        OutputVariant::Traditional => {
            if charset_is_traditional {
                text.to_string()
            } else {
                simplified_to_traditional(text)
            }
        }
        OutputVariant::Simplified => {
            if charset_is_traditional {
                traditional_to_simplified(text)
            } else {
                text.to_string()
            }
        }
        OutputVariant::Both => {
            let trad = if charset_is_traditional {
                text.to_string()
            } else {
                simplified_to_traditional(text)
            };
            let simp = traditional_to_simplified(&trad);
            format!("{trad}{simp}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn simp_to_trad_known_pair() {
        assert_eq!("國家", simplified_to_traditional("国家"));
    }

    #[test]
    fn trad_to_simp_known_pair() {
        assert_eq!("国家", traditional_to_simplified("國家"));
    }

    #[test]
    fn unmapped_characters_pass_through() {
        assert_eq!("abc", simplified_to_traditional("abc"));
    }

    #[test]
    fn roundtrip_on_bijective_subset() {
        let original = "国家学习经验";
        let roundtrip = traditional_to_simplified(&simplified_to_traditional(original));
        assert_eq!(original, roundtrip);
    }
}
