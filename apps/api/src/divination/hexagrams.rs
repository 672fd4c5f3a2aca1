//! Static tables for the eight trigrams and the sixty-four hexagrams.

use serde::Serialize;

/// The eight trigrams in Earlier Heaven (先天) order: 乾1 兑2 离3 震4 巽5 坎6 艮7 坤8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

impl Trigram {
    pub const ALL: [Trigram; 8] = [
        Trigram::Qian,
        Trigram::Dui,
        Trigram::Li,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Kun,
    ];

    /// Trigram for an Earlier Heaven number; any integer is reduced mod 8 with 0 → 坤.
    pub fn from_number(n: u32) -> Trigram {
        match n % 8 {
            0 => Trigram::Kun,
            r => Self::ALL[(r - 1) as usize],
        }
    }

    /// Lines as bits, bottom line in bit 0, yang = 1.
    pub fn bits(self) -> u8 {
        match self {
            Trigram::Qian => 0b111,
            Trigram::Dui => 0b011,
            Trigram::Li => 0b101,
            Trigram::Zhen => 0b001,
            Trigram::Xun => 0b110,
            Trigram::Kan => 0b010,
            Trigram::Gen => 0b100,
            Trigram::Kun => 0b000,
        }
    }

    pub fn from_bits(bits: u8) -> Trigram {
        Self::ALL
            .into_iter()
            .find(|t| t.bits() == bits & 0b111)
            .unwrap_or(Trigram::Kun)
    }

    pub fn name(self) -> &'static str {
        match self {
            Trigram::Qian => "乾",
            Trigram::Dui => "兑",
            Trigram::Li => "离",
            Trigram::Zhen => "震",
            Trigram::Xun => "巽",
            Trigram::Kan => "坎",
            Trigram::Gen => "艮",
            Trigram::Kun => "坤",
        }
    }

    pub fn image(self) -> &'static str {
        match self {
            Trigram::Qian => "天",
            Trigram::Dui => "泽",
            Trigram::Li => "火",
            Trigram::Zhen => "雷",
            Trigram::Xun => "风",
            Trigram::Kan => "水",
            Trigram::Gen => "山",
            Trigram::Kun => "地",
        }
    }
}

impl Serialize for Trigram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// King Wen number by [upper][lower], both in Earlier Heaven order.
#[rustfmt::skip]
const KING_WEN: [[u8; 8]; 8] = [
    //  乾  兑  离  震  巽  坎  艮  坤   (lower)
    [   1, 10, 13, 25, 44,  6, 33, 12], // 乾
    [  43, 58, 49, 17, 28, 47, 31, 45], // 兑
    [  14, 38, 30, 21, 50, 64, 56, 35], // 离
    [  34, 54, 55, 51, 32, 40, 62, 16], // 震
    [   9, 61, 37, 42, 57, 59, 53, 20], // 巽
    [   5, 60, 63,  3, 48, 29, 39,  8], // 坎
    [  26, 41, 22, 27, 18,  4, 52, 23], // 艮
    [  11, 19, 36, 24, 46,  7, 15,  2], // 坤
];

/// (name, judgment, theme) in King Wen order.
#[rustfmt::skip]
const HEXAGRAM_TEXT: [(&str, &str, &str); 64] = [
    ("乾", "元亨利贞。", "刚健进取"),
    ("坤", "元亨，利牝马之贞。", "柔顺承载"),
    ("屯", "元亨利贞，勿用有攸往，利建侯。", "起始艰难"),
    ("蒙", "亨。匪我求童蒙，童蒙求我。", "启蒙求知"),
    ("需", "有孚，光亨，贞吉，利涉大川。", "耐心等待"),
    ("讼", "有孚窒惕，中吉，终凶。", "争讼慎行"),
    ("师", "贞，丈人吉，无咎。", "统众用兵"),
    ("比", "吉。原筮元永贞，无咎。", "亲比和合"),
    ("小畜", "亨。密云不雨，自我西郊。", "小有积蓄"),
    ("履", "履虎尾，不咥人，亨。", "谨慎践行"),
    ("泰", "小往大来，吉亨。", "通泰和顺"),
    ("否", "否之匪人，不利君子贞，大往小来。", "闭塞不通"),
    ("同人", "同人于野，亨，利涉大川，利君子贞。", "和同于人"),
    ("大有", "元亨。", "丰盛富有"),
    ("谦", "亨，君子有终。", "谦逊受益"),
    ("豫", "利建侯行师。", "安乐预备"),
    ("随", "元亨利贞，无咎。", "随时而动"),
    ("蛊", "元亨，利涉大川。先甲三日，后甲三日。", "整治积弊"),
    ("临", "元亨利贞，至于八月有凶。", "居上临下"),
    ("观", "盥而不荐，有孚颙若。", "观察省思"),
    ("噬嗑", "亨，利用狱。", "明断除障"),
    ("贲", "亨，小利有攸往。", "文饰修美"),
    ("剥", "不利有攸往。", "剥落衰退"),
    ("复", "亨。出入无疾，朋来无咎。", "一阳来复"),
    ("无妄", "元亨利贞。其匪正有眚，不利有攸往。", "真实无妄"),
    ("大畜", "利贞，不家食吉，利涉大川。", "蓄德待时"),
    ("颐", "贞吉。观颐，自求口实。", "颐养正道"),
    ("大过", "栋桡，利有攸往，亨。", "过重将倾"),
    ("坎", "习坎，有孚，维心亨，行有尚。", "重重险难"),
    ("离", "利贞，亨。畜牝牛，吉。", "依附光明"),
    ("咸", "亨，利贞，取女吉。", "感应相通"),
    ("恒", "亨，无咎，利贞，利有攸往。", "恒久守常"),
    ("遁", "亨，小利贞。", "退避保身"),
    ("大壮", "利贞。", "强盛守正"),
    ("晋", "康侯用锡马蕃庶，昼日三接。", "晋升光明"),
    ("明夷", "利艰贞。", "韬光养晦"),
    ("家人", "利女贞。", "齐家正内"),
    ("睽", "小事吉。", "乖离求同"),
    ("蹇", "利西南，不利东北；利见大人，贞吉。", "险阻难行"),
    ("解", "利西南，无所往，其来复吉。有攸往，夙吉。", "解除困厄"),
    ("损", "有孚，元吉，无咎，可贞，利有攸往。", "减损得益"),
    ("益", "利有攸往，利涉大川。", "增益助进"),
    ("夬", "扬于王庭，孚号有厉。", "决断去邪"),
    ("姤", "女壮，勿用取女。", "不期而遇"),
    ("萃", "亨。王假有庙，利见大人，亨，利贞。", "聚集会合"),
    ("升", "元亨，用见大人，勿恤，南征吉。", "上升渐进"),
    ("困", "亨，贞，大人吉，无咎，有言不信。", "困穷守志"),
    ("井", "改邑不改井，无丧无得，往来井井。", "养人不穷"),
    ("革", "己日乃孚，元亨利贞，悔亡。", "变革更新"),
    ("鼎", "元吉，亨。", "鼎新立业"),
    ("震", "亨。震来虩虩，笑言哑哑。", "震动警惧"),
    ("艮", "艮其背，不获其身，行其庭，不见其人，无咎。", "止而知止"),
    ("渐", "女归吉，利贞。", "循序渐进"),
    ("归妹", "征凶，无攸利。", "婚嫁之道"),
    ("丰", "亨，王假之，勿忧，宜日中。", "丰盛之极"),
    ("旅", "小亨，旅贞吉。", "羁旅在外"),
    ("巽", "小亨，利有攸往，利见大人。", "顺入谦逊"),
    ("兑", "亨，利贞。", "喜悦和乐"),
    ("涣", "亨。王假有庙，利涉大川，利贞。", "涣散离析"),
    ("节", "亨。苦节不可贞。", "节制有度"),
    ("中孚", "豚鱼吉，利涉大川，利贞。", "诚信中正"),
    ("小过", "亨，利贞，可小事，不可大事。", "小有过越"),
    ("既济", "亨小，利贞，初吉终乱。", "事已成功"),
    ("未济", "亨，小狐汔济，濡其尾，无攸利。", "事尚未成"),
];

/// One of the sixty-four hexagrams with its canned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hexagram {
    /// King Wen sequence number, 1 ..= 64.
    pub number: u8,
    pub name: &'static str,
    /// Full name in the "upper-image lower-image name" form, e.g. 山水蒙.
    pub full_name: String,
    pub symbol: char,
    pub upper: Trigram,
    pub lower: Trigram,
    pub judgment: &'static str,
    pub theme: &'static str,
}

impl Hexagram {
    pub fn from_trigrams(upper: Trigram, lower: Trigram) -> Self {
        let number = KING_WEN[upper as usize][lower as usize];
        let (name, judgment, theme) = HEXAGRAM_TEXT[number as usize - 1];

        let full_name = if upper == lower {
            format!("{}为{}", name, upper.image())
        } else {
            format!("{}{}{}", upper.image(), lower.image(), name)
        };

        Self {
            number,
            name,
            full_name,
            symbol: char::from_u32(0x4DC0 + number as u32 - 1).unwrap_or('?'),
            upper,
            lower,
            judgment,
            theme,
        }
    }

    /// Six lines as bits, bottom line in bit 0.
    pub fn from_bits(bits: u8) -> Self {
        Self::from_trigrams(Trigram::from_bits(bits >> 3), Trigram::from_bits(bits))
    }

    pub fn bits(&self) -> u8 {
        (self.upper.bits() << 3) | self.lower.bits()
    }
}
